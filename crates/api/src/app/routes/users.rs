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
use tracing::info;

use rolegate_auth::{Account, AccountStatus, Directory, account::validate_password, catalog};
use rolegate_core::AccountId;
use rolegate_infra::{AccountChanges, NewAccount};

use crate::app::dto::{self, PaginationView, UserView};
use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn parse_id(id: &str) -> Result<AccountId, axum::response::Response> {
    id.parse().map_err(|_| errors::invalid_id("user"))
}

fn user_view(services: &AppServices, account: &Account) -> Result<UserView, axum::response::Response> {
    let role = services
        .role_of(account)
        .map_err(errors::auth_error_to_response)?;
    Ok(UserView::new(account, role.as_ref()))
}

/// POST /api/users
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let caller = match authz::require(&services, &principal, &catalog::USERS_CREATE) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    if let Err(e) = validate_password(&body.password) {
        return errors::domain_error_to_response(e);
    }
    let password_hash = match services.hasher.hash(&body.password) {
        Ok(hash) => hash,
        Err(e) => return errors::auth_error_to_response(e),
    };

    let account = match services.directory.create_account(NewAccount {
        user_name: body.user_name,
        email: body.email,
        password_hash,
        role_id: body.role_id,
        status: body.status.unwrap_or(AccountStatus::Active),
        hobbies: body.hobbies,
    }) {
        Ok(account) => account,
        Err(e) => return errors::write_error_to_response(e),
    };
    info!(account_id = %account.id, created_by = %caller.account_id(), "user created");

    match user_view(&services, &account) {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User created successfully", "user": user })),
        )
            .into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/users
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    params: Result<Query<dto::ListUsersParams>, QueryRejection>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&services, &principal, &catalog::USERS_LIST) {
        return resp;
    }
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return errors::invalid_query(rejection),
    };

    let page = match services.directory.list_accounts(&params.into_query()) {
        Ok(page) => page,
        Err(e) => return errors::auth_error_to_response(e.into()),
    };

    let mut users = Vec::with_capacity(page.items.len());
    for account in &page.items {
        match user_view(&services, account) {
            Ok(view) => users.push(view),
            Err(resp) => return resp,
        }
    }

    (
        StatusCode::OK,
        Json(json!({
            "users": users,
            "pagination": PaginationView::from(&page),
        })),
    )
        .into_response()
}

/// GET /api/users/:id
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::require(&services, &principal, &catalog::USERS_LIST) {
        return resp;
    }

    let account = match services.directory.find_account_by_id(&id) {
        Ok(Some(account)) => account,
        Ok(None) => return errors::not_found("User"),
        Err(e) => return errors::auth_error_to_response(e.into()),
    };

    match user_view(&services, &account) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(resp) => resp,
    }
}

/// PUT /api/users/:id
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            // Unreadable bodies still answer 403 to callers who may not edit the target.
            if let Err(resp) = authz::require_edit(&services, &principal, &id, &mut AccountChanges::default()) {
                return resp;
            }
            return errors::invalid_body(rejection);
        }
    };

    let mut changes = AccountChanges {
        user_name: body.user_name,
        email: body.email,
        password_hash: None,
        role_id: body.role_id,
        status: body.status,
        hobbies: body.hobbies,
    };

    let caller = match authz::require_edit(&services, &principal, &id, &mut changes) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    if let Some(password) = body.password.filter(|p| !p.is_empty()) {
        if let Err(e) = validate_password(&password) {
            return errors::domain_error_to_response(e);
        }
        changes.password_hash = match services.hasher.hash(&password) {
            Ok(hash) => Some(hash),
            Err(e) => return errors::auth_error_to_response(e),
        };
    }

    let account = match services.directory.update_account(&id, changes) {
        Ok(account) => account,
        Err(e) => return errors::write_error_to_response(e),
    };
    info!(account_id = %account.id, updated_by = %caller.account_id(), "user updated");

    match user_view(&services, &account) {
        Ok(user) => (
            StatusCode::OK,
            Json(json!({ "message": "User updated successfully", "user": user })),
        )
            .into_response(),
        Err(resp) => resp,
    }
}

/// DELETE /api/users/:id (soft delete)
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let caller = match authz::require_delete(&services, &principal, &id) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    if let Err(e) = services.directory.delete_account(&id) {
        return errors::write_error_to_response(e);
    }
    info!(account_id = %id, deleted_by = %caller.account_id(), "user deleted");

    (StatusCode::OK, Json(json!({ "message": "User deleted successfully" }))).into_response()
}
