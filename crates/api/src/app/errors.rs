use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use rolegate_auth::AuthError;
use rolegate_core::DomainError;
use rolegate_infra::WriteError;

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    let status = match &err {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials
        | AuthError::TokenInvalid(_)
        | AuthError::Unauthorized
        | AuthError::AccountNotFound => StatusCode::UNAUTHORIZED,
        AuthError::AccountInactive | AuthError::Forbidden { .. } | AuthError::SelfActionDenied(_) => {
            StatusCode::FORBIDDEN
        }
        AuthError::Internal(detail) => {
            error!(%detail, "internal error while handling request");
            return internal_error();
        }
    };
    json_error(status, err.code(), err.to_string())
}

pub fn write_error_to_response(err: WriteError) -> axum::response::Response {
    match err {
        WriteError::Domain(e) => domain_error_to_response(e),
        WriteError::Store(e) => {
            error!(error = %e, "store unavailable");
            internal_error()
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(what) => json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found")),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Internal server error",
    )
}

pub fn not_found(what: &str) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
}

/// A body that did not deserialize; the caller has already passed the gate.
pub fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn invalid_query(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}

pub fn invalid_id(what: &str) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id"))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use rolegate_auth::{StoreError, TokenError};

    use super::*;

    #[test]
    fn auth_errors_map_to_documented_statuses() {
        let cases = [
            (AuthError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::TokenInvalid(TokenError::Expired), StatusCode::UNAUTHORIZED),
            (AuthError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AuthError::AccountNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::AccountInactive, StatusCode::FORBIDDEN),
            (AuthError::Forbidden { required: vec!["Users_create".into()] }, StatusCode::FORBIDDEN),
            (AuthError::SelfActionDenied("no".into()), StatusCode::FORBIDDEN),
            (AuthError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(auth_error_to_response(err.clone()).status(), status, "{err:?}");
        }
    }

    #[test]
    fn write_errors_map_to_documented_statuses() {
        let cases = [
            (WriteError::Domain(DomainError::validation("bad")), StatusCode::BAD_REQUEST),
            (WriteError::Domain(DomainError::not_found("User")), StatusCode::NOT_FOUND),
            (WriteError::Domain(DomainError::conflict("Email already exists")), StatusCode::CONFLICT),
            (WriteError::Store(StoreError::Unavailable("down".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(write_error_to_response(err.clone()).status(), status, "{err:?}");
        }
    }
}
