use std::sync::Arc;

use axum::{
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use rolegate_auth::{Directory, RoleStatus, catalog};
use rolegate_core::RoleId;
use rolegate_infra::{NewRole, RoleChanges};

use crate::app::dto::{self, PaginationView, RoleView};
use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
}

fn parse_id(id: &str) -> Result<RoleId, axum::response::Response> {
    id.parse().map_err(|_| errors::invalid_id("role"))
}

/// POST /api/roles
pub async fn create_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateRoleRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&services, &principal, &catalog::ROLES_CREATE) {
        return resp;
    }
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    match services.directory.create_role(NewRole {
        name: body.role_name,
        status: body.status.unwrap_or(RoleStatus::Active),
        permission_ids: body.permissions,
    }) {
        Ok(role) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Role created successfully", "role": RoleView::from(&role) })),
        )
            .into_response(),
        Err(e) => errors::write_error_to_response(e),
    }
}

/// GET /api/roles
pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    params: Result<Query<dto::ListRolesParams>, QueryRejection>,
) -> axum::response::Response {
    if let Err(resp) = authz::authenticated(&services, &principal) {
        return resp;
    }
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return errors::invalid_query(rejection),
    };

    match services.directory.list_roles(&params.into_query()) {
        Ok(page) => {
            let roles: Vec<RoleView> = page.items.iter().map(RoleView::from).collect();
            (
                StatusCode::OK,
                Json(json!({ "roles": roles, "pagination": PaginationView::from(&page) })),
            )
                .into_response()
        }
        Err(e) => errors::auth_error_to_response(e.into()),
    }
}

/// GET /api/roles/:id
pub async fn get_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::require(&services, &principal, &catalog::ROLES_LIST) {
        return resp;
    }

    match services.directory.find_role_by_id(&id) {
        Ok(Some(role)) => (StatusCode::OK, Json(RoleView::from(&role))).into_response(),
        Ok(None) => errors::not_found("Role"),
        Err(e) => errors::auth_error_to_response(e.into()),
    }
}

/// PUT /api/roles/:id
pub async fn update_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateRoleRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::require(&services, &principal, &catalog::ROLES_EDIT) {
        return resp;
    }
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    match services.directory.update_role(
        &id,
        RoleChanges {
            name: body.role_name,
            status: body.status,
            permission_ids: body.permissions,
        },
    ) {
        Ok(role) => (
            StatusCode::OK,
            Json(json!({ "message": "Role updated successfully", "role": RoleView::from(&role) })),
        )
            .into_response(),
        Err(e) => errors::write_error_to_response(e),
    }
}

/// DELETE /api/roles/:id (soft delete)
pub async fn delete_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::require(&services, &principal, &catalog::ROLES_DELETE) {
        return resp;
    }

    match services.directory.delete_role(&id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Role deleted successfully" }))).into_response(),
        Err(e) => errors::write_error_to_response(e),
    }
}
