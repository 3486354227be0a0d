use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use rolegate_auth::AuthError;

use crate::app::dto::{self, SignInPermission, SignInResponse, SignInUser};
use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

/// POST /api/auth/signin
pub async fn signin(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SignInRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_body(rejection),
    };
    match signin_inner(&services, &body) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => errors::auth_error_to_response(err),
    }
}

fn signin_inner(services: &AppServices, body: &dto::SignInRequest) -> Result<SignInResponse, AuthError> {
    let account = services.verifier.verify(&body.email, &body.password)?;

    let role = services.role_of(&account)?;
    let permissions = match &role {
        Some(role) => services.gate.resolver().grants_of(role)?,
        None => Vec::new(),
    };

    let issued = services.tokens.issue(account.id, &account.email)?;
    info!(account_id = %account.id, "token issued");

    Ok(SignInResponse {
        message: "Login successful",
        token: issued.token,
        expires_at: issued.expires_at,
        user: SignInUser {
            id: account.id,
            user_name: account.user_name.clone(),
            email: account.email.clone(),
            status: account.status,
            role: role.as_ref().map(|r| r.summary()),
            permissions: permissions
                .into_iter()
                .map(|grant| SignInPermission {
                    module_id: grant.id,
                    module_name: grant.module_name,
                    action: grant.action,
                })
                .collect(),
        },
    })
}

/// GET /api/auth/me
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match authz::authenticated(&services, &principal) {
        Ok(identity) => (StatusCode::OK, Json(dto::MeResponse::from(&identity))).into_response(),
        Err(resp) => resp,
    }
}
