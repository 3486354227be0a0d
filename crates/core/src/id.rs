//! Identifiers for the three stored entity kinds.
//!
//! All ids are UUIDv7, so ordering by id follows creation order. Path
//! parameters and JSON bodies carry them in hyphenated text form.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {e}", stringify!($name))))
            }
        }
    };
}

entity_id! {
    /// An account. Also the `sub` claim of every token issued for it, so a
    /// token keeps pointing at the same account across renames and email changes.
    AccountId
}

entity_id! {
    /// A role, as referenced by an account's `roleId`.
    RoleId
}

entity_id! {
    /// A stored `(module, action)` grant. Roles list these ids, never the
    /// pair itself, so deleting the grant removes it from every role at once.
    PermissionId
}
