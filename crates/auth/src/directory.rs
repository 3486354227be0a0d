//! Persistence port used by the authentication core.

use std::sync::Arc;

use thiserror::Error;

use rolegate_core::{AccountId, PermissionId, RoleId};

use crate::{Account, PermissionGrant, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Read access to accounts, roles and grants.
///
/// Implementations return live (non-deleted) entities only, or `None`.
/// Transient storage failures surface as [`StoreError`]; retries, if any,
/// belong to the implementation.
pub trait Directory: Send + Sync {
    /// Lookup by normalized (trimmed, lowercased) email.
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    fn find_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// The role with its permissions expanded where possible.
    fn find_role_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError>;

    fn find_permission_by_id(&self, id: &PermissionId) -> Result<Option<PermissionGrant>, StoreError>;
}

impl<D> Directory for Arc<D>
where
    D: Directory + ?Sized,
{
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_account_by_email(email)
    }

    fn find_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        (**self).find_account_by_id(id)
    }

    fn find_role_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError> {
        (**self).find_role_by_id(id)
    }

    fn find_permission_by_id(&self, id: &PermissionId) -> Result<Option<PermissionGrant>, StoreError> {
        (**self).find_permission_by_id(id)
    }
}
