use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::app::dto::GrantView;
use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_modules))
        .route("/grouped", get(grouped_modules))
}

/// GET /api/modules
pub async fn list_modules(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::authenticated(&services, &principal) {
        return resp;
    }

    match services.directory.grants() {
        Ok(grants) => {
            let modules: Vec<GrantView> = grants.iter().map(GrantView::from).collect();
            (StatusCode::OK, Json(json!({ "modules": modules }))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e.into()),
    }
}

/// GET /api/modules/grouped
pub async fn grouped_modules(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::authenticated(&services, &principal) {
        return resp;
    }

    match services.directory.grouped_grants() {
        Ok(groups) => (StatusCode::OK, Json(json!({ "modules": groups }))).into_response(),
        Err(e) => errors::auth_error_to_response(e.into()),
    }
}
