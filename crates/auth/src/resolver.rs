//! Live permission resolution.
//!
//! Nothing is cached: every call walks account → role → grants against the
//! current state of the [`Directory`].

use std::collections::HashSet;

use tracing::{debug, warn};

use rolegate_core::{AccountId, Entity};

use crate::{
    Account, AuthError, Directory, IdentityContext, PermissionGrant, PermissionRef, PermissionSet,
    Principal, Role, RoleRef,
};

#[derive(Debug, Clone)]
pub struct PermissionResolver<D> {
    directory: D,
}

impl<D: Directory> PermissionResolver<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Effective permission set of an account.
    ///
    /// Fails with [`AuthError::AccountNotFound`] when the account is missing
    /// or soft-deleted. A missing, inactive or deleted role yields an empty set.
    pub fn resolve(&self, account_id: &AccountId) -> Result<PermissionSet, AuthError> {
        let account = self.load_account(account_id)?;
        let grants = self.grants_for(&account)?;
        Ok(grants.iter().map(PermissionGrant::permission).collect())
    }

    /// Build the request identity for a validated token bearer.
    ///
    /// Unlike [`Self::resolve`], an inactive account is rejected here.
    pub fn identify(&self, principal: &Principal) -> Result<IdentityContext, AuthError> {
        let account = self.load_account(&principal.account_id)?;
        if !account.is_active() {
            warn!(account_id = %account.id, "request rejected: account inactive");
            return Err(AuthError::AccountInactive);
        }

        let role = self.load_role(&account.role)?;
        let permissions: PermissionSet = match &role {
            Some(role) => self
                .grants_of(role)?
                .iter()
                .map(PermissionGrant::permission)
                .collect(),
            None => PermissionSet::new(),
        };

        debug!(
            account_id = %account.id,
            permissions = permissions.len(),
            "identity resolved"
        );
        Ok(IdentityContext::new(
            &account,
            role.as_ref().map(Role::summary),
            permissions,
        ))
    }

    /// Live grants of a role; empty when the role grants nothing.
    pub fn grants_of(&self, role: &Role) -> Result<Vec<PermissionGrant>, AuthError> {
        if !role.grants_permissions() {
            debug!(role_id = %role.id, status = %role.status, "role grants nothing");
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut grants = Vec::with_capacity(role.permissions.len());
        for reference in &role.permissions {
            let grant = match reference {
                PermissionRef::Expanded(grant) => Some(grant.clone()),
                PermissionRef::Reference(id) => self.directory.find_permission_by_id(id)?,
            };
            match grant {
                Some(grant) if grant.is_live() => {
                    if seen.insert(grant.id) {
                        grants.push(grant);
                    }
                }
                _ => debug!(role_id = %role.id, permission_id = %reference.id(), "skipping unavailable grant"),
            }
        }
        Ok(grants)
    }

    fn load_account(&self, account_id: &AccountId) -> Result<Account, AuthError> {
        match self.directory.find_account_by_id(account_id)? {
            Some(account) if account.is_live() => Ok(account),
            _ => {
                warn!(account_id = %account_id, "account not found or deleted");
                Err(AuthError::AccountNotFound)
            }
        }
    }

    fn load_role(&self, reference: &RoleRef) -> Result<Option<Role>, AuthError> {
        let role = match reference {
            RoleRef::Expanded(role) => Some(role.as_ref().clone()),
            RoleRef::Reference(id) => self.directory.find_role_by_id(id)?,
        };
        Ok(role.filter(|role| role.is_live()))
    }

    fn grants_for(&self, account: &Account) -> Result<Vec<PermissionGrant>, AuthError> {
        match self.load_role(&account.role)? {
            Some(role) => self.grants_of(&role),
            None => Ok(Vec::new()),
        }
    }
}
