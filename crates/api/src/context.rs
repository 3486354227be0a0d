use rolegate_auth::Principal;
use rolegate_core::AccountId;

/// Principal context for a request (the verified token subject).
///
/// Carries identity only. Permissions are resolved per request by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn account_id(&self) -> AccountId {
        self.principal.account_id
    }
}
