use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_core::{Entity, PermissionId};

/// A grantable capability: an action within a module.
///
/// Permissions are compared as structured `(module, action)` pairs. The joined
/// string form (`"Users_create"`) only exists at presentation boundaries, so a
/// module or action containing the separator can never collide with another
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(rename = "moduleName")]
    module: Cow<'static, str>,
    action: Cow<'static, str>,
}

impl Permission {
    pub fn new(module: impl Into<Cow<'static, str>>, action: impl Into<Cow<'static, str>>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
        }
    }

    pub const fn from_static(module: &'static str, action: &'static str) -> Self {
        Self {
            module: Cow::Borrowed(module),
            action: Cow::Borrowed(action),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Joined `module_action` key, as shown to clients and in denial messages.
    pub fn key(&self) -> String {
        format!("{}_{}", self.module, self.action)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}_{}", self.module, self.action)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stored grants
// ─────────────────────────────────────────────────────────────────────────────

/// A stored module grant (the persisted form of a [`Permission`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    pub id: PermissionId,
    pub module_name: String,
    pub action: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PermissionGrant {
    pub fn new(module_name: impl Into<String>, action: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: PermissionId::new(),
            module_name: module_name.into().trim().to_string(),
            action: action.into().trim().to_string(),
            description: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn permission(&self) -> Permission {
        Permission::new(self.module_name.clone(), self.action.clone())
    }

    pub fn is_same_pair(&self, permission: &Permission) -> bool {
        self.module_name == permission.module() && self.action == permission.action()
    }
}

impl Entity for PermissionGrant {
    type Id = PermissionId;

    fn id(&self) -> &PermissionId {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

/// A role's link to a grant: either a bare id or the expanded grant.
///
/// Persistence layers may hand back either shape; the resolver handles both
/// explicitly instead of guessing from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PermissionRef {
    Reference(PermissionId),
    Expanded(PermissionGrant),
}

impl PermissionRef {
    pub fn id(&self) -> PermissionId {
        match self {
            PermissionRef::Reference(id) => *id,
            PermissionRef::Expanded(grant) => grant.id,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved set
// ─────────────────────────────────────────────────────────────────────────────

/// Effective permissions of an account (membership-only semantics).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    /// True when at least one of `required` is held.
    pub fn intersects(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.0.contains(p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joined keys, sorted for stable output.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.0.iter().map(Permission::key).collect();
        keys.sort();
        keys
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
