use thiserror::Error;

use rolegate_core::DomainError;

use crate::{Permission, StoreError, TokenError};

/// Every way an authentication or authorization decision can fail.
///
/// All variants are terminal for the request; nothing here is retried.
/// `Internal` is kept apart from the rest so callers can tell "you are not
/// allowed" from "the system is broken".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password (deliberately indistinguishable).
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Your account has been deactivated. Please contact administrator.")]
    AccountInactive,

    #[error("Invalid or expired token: {0}")]
    TokenInvalid(#[from] TokenError),

    /// No credentials were presented at all.
    #[error("No token provided")]
    Unauthorized,

    /// Valid identity, insufficient grant. Names what was missing.
    #[error("Access denied. Required permission: {}", .required.join(" or "))]
    Forbidden { required: Vec<String> },

    #[error("{0}")]
    SelfActionDenied(String),

    #[error("Account not found or deleted")]
    AccountNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn forbidden(required: &[Permission]) -> Self {
        Self::Forbidden {
            required: required.iter().map(Permission::key).collect(),
        }
    }

    /// Stable machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountInactive => "account_inactive",
            AuthError::TokenInvalid(_) => "token_invalid",
            AuthError::Unauthorized => "unauthorized",
            AuthError::Forbidden { .. } => "forbidden",
            AuthError::SelfActionDenied(_) => "self_action_denied",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::Validation(_) => "validation_error",
            AuthError::Internal(_) => "internal_error",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        AuthError::Internal(value.to_string())
    }
}

impl From<DomainError> for AuthError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => AuthError::Validation(msg),
            DomainError::InvalidId(msg) => AuthError::Validation(msg),
            other => AuthError::Internal(other.to_string()),
        }
    }
}
