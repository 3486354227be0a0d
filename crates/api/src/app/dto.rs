use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_auth::{
    Account, AccountStatus, IdentityContext, PermissionGrant, PermissionRef, Role, RoleStatus,
    RoleSummary,
};
use rolegate_core::{AccountId, Entity, PermissionId, RoleId};
use rolegate_infra::{
    AccountQuery, AccountSortKey, Page, PageRequest, RoleQuery, RoleSortKey, SortOrder,
    query::DEFAULT_PAGE_SIZE,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub role_id: RoleId,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub hobbies: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<RoleId>,
    pub status: Option<AccountStatus>,
    pub hobbies: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub role_name: String,
    #[serde(default)]
    pub status: Option<RoleStatus>,
    #[serde(default)]
    pub permissions: Vec<PermissionId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role_name: Option<String>,
    pub status: Option<RoleStatus>,
    pub permissions: Option<Vec<PermissionId>>,
}

/// `GET /api/users` query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
    pub role_id: Option<RoleId>,
    pub sort_by: Option<AccountSortKey>,
    pub order: Option<SortOrder>,
}

impl ListUsersParams {
    pub fn into_query(self) -> AccountQuery {
        AccountQuery {
            search: self.search,
            status: self.status,
            role_id: self.role_id,
            sort_by: self.sort_by.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            page: page_request(self.page, self.limit),
        }
    }
}

/// `GET /api/roles` query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRolesParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<RoleStatus>,
    pub sort_by: Option<RoleSortKey>,
    pub order: Option<SortOrder>,
}

impl ListRolesParams {
    pub fn into_query(self) -> RoleQuery {
        RoleQuery {
            search: self.search,
            status: self.status,
            sort_by: self.sort_by.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            page: page_request(self.page, self.limit),
        }
    }
}

fn page_request(page: Option<u32>, limit: Option<u32>) -> PageRequest {
    PageRequest::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_SIZE))
}

// -------------------------
// Response views
// -------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantView {
    pub id: PermissionId,
    pub module_name: String,
    pub action: String,
    pub description: Option<String>,
}

impl From<&PermissionGrant> for GrantView {
    fn from(grant: &PermissionGrant) -> Self {
        Self {
            id: grant.id,
            module_name: grant.module_name.clone(),
            action: grant.action.clone(),
            description: grant.description.clone(),
        }
    }
}

/// Permission entry of the sign-in payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInPermission {
    pub module_id: PermissionId,
    pub module_name: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub id: RoleId,
    pub role_name: String,
    pub status: RoleStatus,
    pub permissions: Vec<GrantView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Role> for RoleView {
    fn from(role: &Role) -> Self {
        // Only expanded, live grants are shown; dangling references are dropped.
        let permissions = role
            .permissions
            .iter()
            .filter_map(|p| match p {
                PermissionRef::Expanded(grant) if grant.is_live() => Some(GrantView::from(grant)),
                _ => None,
            })
            .collect();
        Self {
            id: role.id,
            role_name: role.name.clone(),
            status: role.status,
            permissions,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: AccountId,
    pub user_name: String,
    pub email: String,
    pub status: AccountStatus,
    /// `None` when the role has since been deleted.
    pub role: Option<RoleView>,
    pub hobbies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserView {
    pub fn new(account: &Account, role: Option<&Role>) -> Self {
        Self {
            id: account.id,
            user_name: account.user_name.clone(),
            email: account.email.clone(),
            status: account.status,
            role: role.map(RoleView::from),
            hobbies: account.hobbies.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInUser {
    pub id: AccountId,
    pub user_name: String,
    pub email: String,
    pub status: AccountStatus,
    pub role: Option<RoleSummary>,
    pub permissions: Vec<SignInPermission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SignInUser,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: AccountId,
    pub user_name: String,
    pub email: String,
    pub role: Option<RoleSummary>,
    pub permissions: Vec<String>,
}

impl From<&IdentityContext> for MeResponse {
    fn from(identity: &IdentityContext) -> Self {
        Self {
            id: identity.account_id(),
            user_name: identity.user_name().to_string(),
            email: identity.email().to_string(),
            role: identity.role().cloned(),
            permissions: identity.permissions().keys(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> From<&Page<T>> for PaginationView {
    fn from(page: &Page<T>) -> Self {
        Self {
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn list_params_default_and_clamp() {
        let query = ListUsersParams::default().into_query();
        assert_eq!(query.page, PageRequest::default());
        assert_eq!(query.order, SortOrder::Desc);

        let query = ListRolesParams {
            page: Some(0),
            limit: Some(1000),
            ..Default::default()
        }
        .into_query();
        assert_eq!(query.page.page(), 1);
        assert_eq!(query.page.limit(), 100);
    }

    #[test]
    fn role_view_hides_deleted_and_unexpanded_grants() {
        let now = Utc::now();
        let live = PermissionGrant::new("Users", "list", now);
        let mut deleted = PermissionGrant::new("Users", "delete", now);
        deleted.is_deleted = true;

        let mut role = Role::new("Viewer", now);
        role.permissions = vec![
            PermissionRef::Expanded(live.clone()),
            PermissionRef::Expanded(deleted),
            PermissionRef::Reference(PermissionId::new()),
        ];

        let view = serde_json::to_value(RoleView::from(&role)).unwrap();
        assert_eq!(view["roleName"], json!("Viewer"));
        assert_eq!(view["permissions"].as_array().unwrap().len(), 1);
        assert_eq!(view["permissions"][0]["moduleName"], json!("Users"));
        assert_eq!(view["permissions"][0]["id"], json!(live.id.to_string()));
    }

    #[test]
    fn update_request_accepts_partial_bodies() {
        let body: UpdateUserRequest = serde_json::from_value(json!({"userName": "renamed"})).unwrap();
        assert_eq!(body.user_name.as_deref(), Some("renamed"));
        assert!(body.role_id.is_none() && body.status.is_none());
    }
}
