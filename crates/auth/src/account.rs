//! Accounts: the identities that authenticate and act.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use rolegate_core::{AccountId, DomainError, Entity, RoleId};

use crate::{PasswordHash, RoleRef};

pub const USER_NAME_MIN: usize = 3;
pub const USER_NAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

// ─────────────────────────────────────────────────────────────────────────────
// Account Status
// ─────────────────────────────────────────────────────────────────────────────

/// Account status. Inactive accounts cannot authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "Active"),
            AccountStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

impl core::str::FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(AccountStatus::Active),
            "Inactive" => Ok(AccountStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "status must be Active or Inactive, got '{other}'"
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Account
// ─────────────────────────────────────────────────────────────────────────────

/// A stored account.
///
/// # Invariants
/// - `email` is unique among live accounts and stored trimmed + lowercased.
/// - `password_hash` never leaves the core; public views use [`AccountSummary`].
/// - Deletion only sets `is_deleted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub user_name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub status: AccountStatus,
    pub role: RoleRef,
    pub hobbies: Vec<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn role_id(&self) -> RoleId {
        self.role.id()
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            user_name: self.user_name.clone(),
            email: self.email.clone(),
            status: self.status,
            role_id: self.role.id(),
            hobbies: self.hobbies.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &AccountId {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

/// Public account view (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: AccountId,
    pub user_name: String,
    pub email: String,
    pub status: AccountStatus,
    pub role_id: RoleId,
    pub hobbies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Input validation
// ─────────────────────────────────────────────────────────────────────────────

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check the basic `local@domain.tld` shape and return the normalized address.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let normalized = normalize_email(email);
    if !EMAIL_PATTERN.is_match(&normalized) {
        return Err(DomainError::validation("Invalid email format"));
    }
    Ok(normalized)
}

pub fn validate_user_name(user_name: &str) -> Result<String, DomainError> {
    let trimmed = user_name.trim();
    let len = trimmed.chars().count();
    if !(USER_NAME_MIN..=USER_NAME_MAX).contains(&len) {
        return Err(DomainError::validation(format!(
            "Username must be between {USER_NAME_MIN} and {USER_NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(DomainError::validation(format!(
            "Password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_accepts_basic_addresses() {
        assert_eq!(validate_email("  Alice@Example.COM ").unwrap(), "alice@example.com");
        assert!(validate_email("a@b.co").is_ok());
    }

    #[test]
    fn email_pattern_rejects_malformed_addresses() {
        for bad in ["", "alice", "alice@", "alice@example", "al ice@example.com", "@example.com"] {
            assert!(validate_email(bad).is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("").is_err());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn user_name_bounds() {
        assert!(validate_user_name("ab").is_err());
        assert!(validate_user_name(&"a".repeat(51)).is_err());
        assert_eq!(validate_user_name(" bob ").unwrap(), "bob");
    }

    #[test]
    fn summary_carries_role_reference_not_hash() {
        let now = Utc::now();
        let role_id = RoleId::new();
        let account = Account {
            id: AccountId::new(),
            user_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: PasswordHash::from_stored("$2b$04$hash"),
            status: AccountStatus::Active,
            role: RoleRef::Reference(role_id),
            hobbies: vec![],
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(account.summary()).unwrap();
        assert_eq!(json["roleId"], role_id.to_string());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
    }
}
