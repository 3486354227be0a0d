use serde::{Deserialize, Serialize};

use rolegate_core::AccountId;

use crate::TokenClaims;

/// The bearer of a token whose signature and expiry checked out.
///
/// This says *who* is calling, never *what* they may do; authorization always
/// goes through the [`crate::Gate`], which re-loads the live account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub account_id: AccountId,
    pub email: String,
}

impl Principal {
    pub fn new(account_id: AccountId, email: impl Into<String>) -> Self {
        Self {
            account_id,
            email: email.into(),
        }
    }

    pub fn is(&self, account_id: &AccountId) -> bool {
        self.account_id == *account_id
    }
}

impl From<TokenClaims> for Principal {
    fn from(claims: TokenClaims) -> Self {
        Self {
            account_id: claims.sub,
            email: claims.email,
        }
    }
}
