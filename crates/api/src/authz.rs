//! API-side authorization guard.
//!
//! Every protected handler calls one of these before touching the directory.
//! Each returns the caller's freshly resolved identity, or the rejection
//! response to send back as-is.

use axum::response::Response;
use tracing::warn;

use rolegate_auth::{AuthError, Directory, IdentityContext, Permission, Requirement, authorize, catalog};
use rolegate_core::AccountId;
use rolegate_infra::AccountChanges;

use crate::app::{errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn authenticated(
    services: &AppServices,
    principal: &PrincipalContext,
) -> Result<IdentityContext, Response> {
    services
        .gate
        .authenticate(principal.principal())
        .map_err(errors::auth_error_to_response)
}

pub fn require(
    services: &AppServices,
    principal: &PrincipalContext,
    permission: &Permission,
) -> Result<IdentityContext, Response> {
    services
        .gate
        .require(principal.principal(), permission)
        .map_err(errors::auth_error_to_response)
}

/// Self-edits need `Users_edit_self`, others `Users_edit_any`. Changing one's
/// own role or status needs `Users_edit_any` on top; repeating the current
/// value is not a change and is pruned from `changes`.
pub fn require_edit(
    services: &AppServices,
    principal: &PrincipalContext,
    target: &AccountId,
    changes: &mut AccountChanges,
) -> Result<IdentityContext, Response> {
    let identity = services
        .gate
        .require_edit(principal.principal(), target)
        .map_err(errors::auth_error_to_response)?;

    if !identity.is_self(target) || !changes.touches_access() {
        return Ok(identity);
    }

    match services.directory.find_account_by_id(target) {
        Ok(Some(current)) => changes.drop_unchanged_access(&current),
        Ok(None) => return Err(errors::auth_error_to_response(AuthError::AccountNotFound)),
        Err(e) => return Err(errors::auth_error_to_response(e.into())),
    }

    if changes.touches_access() {
        authorize(&identity, &Requirement::One(catalog::USERS_EDIT_ANY)).map_err(|err| {
            warn!(account_id = %identity.account_id(), "self role/status change refused");
            errors::auth_error_to_response(err)
        })?;
    }

    Ok(identity)
}

pub fn require_delete(
    services: &AppServices,
    principal: &PrincipalContext,
    target: &AccountId,
) -> Result<IdentityContext, Response> {
    services
        .gate
        .require_delete(principal.principal(), target)
        .map_err(errors::auth_error_to_response)
}
