use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_core::{DomainError, Entity, RoleId};

use crate::PermissionRef;

pub const ROLE_NAME_MIN: usize = 2;
pub const ROLE_NAME_MAX: usize = 50;

/// Role status. Only active roles grant anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoleStatus {
    #[default]
    Active,
    Inactive,
}

impl core::fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RoleStatus::Active => write!(f, "Active"),
            RoleStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

impl core::str::FromStr for RoleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(RoleStatus::Active),
            "Inactive" => Ok(RoleStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "status must be Active or Inactive, got '{other}'"
            ))),
        }
    }
}

/// A named, reusable bundle of permissions.
///
/// # Invariants
/// - `name` is unique among live roles, compared case-insensitively.
/// - An inactive or soft-deleted role grants zero permissions, even though
///   accounts may still reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    #[serde(rename = "roleName")]
    pub name: String,
    pub status: RoleStatus,
    pub permissions: Vec<PermissionRef>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            status: RoleStatus::Active,
            permissions: Vec::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this role currently contributes permissions.
    pub fn grants_permissions(&self) -> bool {
        self.status == RoleStatus::Active && !self.is_deleted
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub fn summary(&self) -> RoleSummary {
        RoleSummary {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
        }
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &RoleId {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

/// An account's link to its role: a bare id or the expanded role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RoleRef {
    Reference(RoleId),
    Expanded(Box<Role>),
}

impl RoleRef {
    pub fn id(&self) -> RoleId {
        match self {
            RoleRef::Reference(id) => *id,
            RoleRef::Expanded(role) => role.id,
        }
    }
}

impl From<RoleId> for RoleRef {
    fn from(value: RoleId) -> Self {
        RoleRef::Reference(value)
    }
}

/// Public view of a role attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub id: RoleId,
    #[serde(rename = "roleName")]
    pub name: String,
    pub status: RoleStatus,
}

/// Trim and length-check a role name.
pub fn validate_role_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Role name is required"));
    }
    let len = trimmed.chars().count();
    if !(ROLE_NAME_MIN..=ROLE_NAME_MAX).contains(&len) {
        return Err(DomainError::validation(format!(
            "Role name must be between {ROLE_NAME_MIN} and {ROLE_NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_or_deleted_role_grants_nothing() {
        let mut role = Role::new("Viewer", Utc::now());
        assert!(role.grants_permissions());

        role.status = RoleStatus::Inactive;
        assert!(!role.grants_permissions());

        role.status = RoleStatus::Active;
        role.is_deleted = true;
        assert!(!role.grants_permissions());
    }

    #[test]
    fn name_comparison_ignores_case_and_padding() {
        let role = Role::new("Admin", Utc::now());
        assert!(role.has_name(" admin "));
        assert!(!role.has_name("administrator"));
    }

    #[test]
    fn role_name_length_is_enforced() {
        assert!(validate_role_name("A").is_err());
        assert!(validate_role_name("   ").is_err());
        assert!(validate_role_name(&"x".repeat(51)).is_err());
        assert_eq!(validate_role_name("  Editor ").unwrap(), "Editor");
    }

    #[test]
    fn status_parses_exact_variants() {
        assert_eq!("Inactive".parse::<RoleStatus>().unwrap(), RoleStatus::Inactive);
        assert!("inactive".parse::<RoleStatus>().is_err());
    }
}
