//! User management endpoints (hierarchy-gated).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};

use nimbuscrm_auth::{can_manage_user, Principal, TenantPrincipal};
use nimbuscrm_core::{AuthError, TenantId, UserId};
use nimbuscrm_store::UserStore;

use crate::errors::ApiResult;
use crate::guards;
use crate::state::AppState;

/// DELETE /tenants/:tenant_id/users/:user_id
///
/// Self-deletion is rejected here at the boundary; `can_manage_user` is
/// deliberately silent on it.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, user_id)): Path<(TenantId, UserId)>,
) -> ApiResult<StatusCode> {
    guards::verify_tenant_context(&principal, Some(tenant_id))?;
    let actor = guards::require_tenant_principal(&principal)?;

    if actor.id == user_id {
        return Err(AuthError::forbidden("cannot delete your own account").into());
    }

    let target = state
        .users
        .find_auth_user(user_id)?
        .ok_or(AuthError::NotFound)?;
    // Users outside the path tenant are hidden, not forbidden.
    if target.tenant_id != Some(tenant_id) {
        return Err(AuthError::NotFound.into());
    }

    let target = TenantPrincipal::from(target);
    if !can_manage_user(actor, &target) {
        return Err(AuthError::forbidden("insufficient rank to manage this user").into());
    }

    state.users.delete(user_id)?;
    tracing::info!(user = %user_id, tenant = %tenant_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
