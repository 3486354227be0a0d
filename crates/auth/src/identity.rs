use rolegate_core::AccountId;

use crate::{Account, Permission, PermissionSet, RoleSummary};

/// The authenticated caller of one request.
///
/// Built fresh by the [`crate::PermissionResolver`] for every request and
/// passed explicitly to whatever runs next. Holds no persistent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    account_id: AccountId,
    email: String,
    user_name: String,
    role: Option<RoleSummary>,
    permissions: PermissionSet,
}

impl IdentityContext {
    pub fn new(account: &Account, role: Option<RoleSummary>, permissions: PermissionSet) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
            user_name: account.user_name.clone(),
            role,
            permissions,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn role(&self) -> Option<&RoleSummary> {
        self.role.as_ref()
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn has(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    pub fn is_self(&self, target: &AccountId) -> bool {
        self.account_id == *target
    }
}
