//! `rolegate-auth` — authentication/authorization core.
//!
//! Credential verification, token issuance/validation, permission resolution
//! and the authorization gate. This crate is intentionally decoupled from HTTP
//! and from any concrete storage: persistence is reached through the
//! [`Directory`] port.

pub mod account;
pub mod catalog;
pub mod claims;
pub mod credentials;
pub mod directory;
pub mod error;
pub mod gate;
pub mod identity;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod resolver;
pub mod roles;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use account::{Account, AccountStatus, AccountSummary};
pub use claims::{TokenClaims, TokenError, validate_claims};
pub use credentials::CredentialVerifier;
pub use directory::{Directory, StoreError};
pub use error::AuthError;
pub use gate::{Gate, Requirement, authorize, edit_requirement};
pub use identity::IdentityContext;
pub use password::{PasswordHash, PasswordHasher};
pub use permissions::{Permission, PermissionGrant, PermissionRef, PermissionSet};
pub use principal::Principal;
pub use resolver::PermissionResolver;
pub use roles::{Role, RoleRef, RoleStatus, RoleSummary};
pub use token::{IssuedToken, TokenConfig, TokenService};
