//! Account/role/grant persistence behind the [`rolegate_auth::Directory`] port.

mod in_memory;

pub use in_memory::InMemoryDirectory;

use serde::Serialize;
use thiserror::Error;

use rolegate_auth::{Account, AccountStatus, AuthError, PasswordHash, RoleStatus, StoreError};
use rolegate_core::{DomainError, PermissionId, RoleId};

/// Why a mutation was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<WriteError> for AuthError {
    fn from(value: WriteError) -> Self {
        match value {
            WriteError::Domain(e) => e.into(),
            WriteError::Store(e) => e.into(),
        }
    }
}

/// A new account. The password is hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub role_id: RoleId,
    pub status: AccountStatus,
    pub hobbies: Vec<String>,
}

/// Partial account update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<PasswordHash>,
    pub role_id: Option<RoleId>,
    pub status: Option<AccountStatus>,
    pub hobbies: Option<Vec<String>>,
}

impl AccountChanges {
    /// Whether applying these changes alters what the account may do.
    pub fn touches_access(&self) -> bool {
        self.role_id.is_some() || self.status.is_some()
    }

    /// Forget a requested role or status that `current` already has.
    pub fn drop_unchanged_access(&mut self, current: &Account) {
        if self.role_id == Some(current.role.id()) {
            self.role_id = None;
        }
        if self.status == Some(current.status) {
            self.status = None;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub status: RoleStatus,
    pub permission_ids: Vec<PermissionId>,
}

#[derive(Debug, Clone, Default)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub status: Option<RoleStatus>,
    pub permission_ids: Option<Vec<PermissionId>>,
}

/// One action inside a [`ModuleGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAction {
    pub id: PermissionId,
    pub action: String,
}

/// Live grants of one module, actions sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleGroup {
    pub module_name: String,
    pub actions: Vec<ModuleAction>,
}
