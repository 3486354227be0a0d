//! Authorization gate: binary proceed/reject decisions per operation.

use tracing::warn;

use rolegate_core::AccountId;

use crate::{AuthError, Directory, IdentityContext, Permission, PermissionResolver, Principal, catalog};

/// What an operation demands of its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any live, active account.
    Authenticated,
    One(Permission),
    /// At least one of the listed grants.
    AnyOf(Vec<Permission>),
}

impl Requirement {
    pub fn alternatives(&self) -> &[Permission] {
        match self {
            Requirement::Authenticated => &[],
            Requirement::One(permission) => core::slice::from_ref(permission),
            Requirement::AnyOf(permissions) => permissions.as_slice(),
        }
    }
}

/// Check a resolved identity against a requirement.
///
/// - No IO
/// - No panics
/// - `AnyOf(vec![])` is never satisfied
pub fn authorize(identity: &IdentityContext, requirement: &Requirement) -> Result<(), AuthError> {
    let allowed = match requirement {
        Requirement::Authenticated => true,
        Requirement::One(permission) => identity.has(permission),
        Requirement::AnyOf(permissions) => identity.permissions().intersects(permissions),
    };

    if allowed {
        Ok(())
    } else {
        Err(AuthError::forbidden(requirement.alternatives()))
    }
}

/// Grant needed to edit `target` on behalf of `caller`.
pub fn edit_requirement(caller: &AccountId, target: &AccountId) -> Requirement {
    if caller == target {
        Requirement::One(catalog::USERS_EDIT_SELF)
    } else {
        Requirement::One(catalog::USERS_EDIT_ANY)
    }
}

/// Resolves the caller fresh on every check and enforces a [`Requirement`].
#[derive(Debug, Clone)]
pub struct Gate<D> {
    resolver: PermissionResolver<D>,
}

impl<D: Directory> Gate<D> {
    pub fn new(directory: D) -> Self {
        Self {
            resolver: PermissionResolver::new(directory),
        }
    }

    pub fn resolver(&self) -> &PermissionResolver<D> {
        &self.resolver
    }

    /// Identity only; for operations that need no grant.
    pub fn authenticate(&self, principal: &Principal) -> Result<IdentityContext, AuthError> {
        self.resolver.identify(principal)
    }

    pub fn check(
        &self,
        principal: &Principal,
        requirement: &Requirement,
    ) -> Result<IdentityContext, AuthError> {
        let identity = self.resolver.identify(principal)?;
        if let Err(err) = authorize(&identity, requirement) {
            warn!(
                account_id = %identity.account_id(),
                required = ?requirement.alternatives().iter().map(Permission::key).collect::<Vec<_>>(),
                "permission denied"
            );
            return Err(err);
        }
        Ok(identity)
    }

    pub fn require(
        &self,
        principal: &Principal,
        permission: &Permission,
    ) -> Result<IdentityContext, AuthError> {
        self.check(principal, &Requirement::One(permission.clone()))
    }

    pub fn require_any(
        &self,
        principal: &Principal,
        permissions: &[Permission],
    ) -> Result<IdentityContext, AuthError> {
        self.check(principal, &Requirement::AnyOf(permissions.to_vec()))
    }

    /// Run `op` with the caller's identity, or reject without running it.
    pub fn guard<T, E, F>(&self, principal: &Principal, requirement: &Requirement, op: F) -> Result<T, E>
    where
        F: FnOnce(&IdentityContext) -> Result<T, E>,
        E: From<AuthError>,
    {
        let identity = self.check(principal, requirement)?;
        op(&identity)
    }

    /// Editing oneself needs `Users_edit_self`; anyone else, `Users_edit_any`.
    pub fn require_edit(
        &self,
        principal: &Principal,
        target: &AccountId,
    ) -> Result<IdentityContext, AuthError> {
        self.check(principal, &edit_requirement(&principal.account_id, target))
    }

    /// Self-deletion is refused before any lookup, whatever the caller holds.
    pub fn require_delete(
        &self,
        principal: &Principal,
        target: &AccountId,
    ) -> Result<IdentityContext, AuthError> {
        if principal.is(target) {
            warn!(account_id = %target, "self-deletion refused");
            return Err(AuthError::SelfActionDenied(
                "You cannot delete your own account".to_string(),
            ));
        }
        self.require(principal, &catalog::USERS_DELETE)
    }
}
