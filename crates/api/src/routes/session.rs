//! Login and session introspection.
//!
//! Every login failure is the same generic 401 regardless of whether the
//! email was unknown, the account deactivated, or the password wrong.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use nimbuscrm_auth::{verify_password, Principal, TokenSeed};
use nimbuscrm_core::{AuthError, UserType};
use nimbuscrm_store::{ResellerStore, UserStore};

use crate::errors::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

fn invalid_credentials() -> AuthError {
    AuthError::unauthenticated_because("invalid credentials")
}

/// POST /auth/login — tenant-user email+password login.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .find_by_email(req.email.trim())
        .map_err(|e| {
            tracing::debug!(error = %e, "user lookup failed during login");
            invalid_credentials()
        })?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(invalid_credentials().into());
    }
    let ok = verify_password(&req.password, &user.password_hash).map_err(|e| {
        tracing::debug!(error = %e, "password verification failed during login");
        invalid_credentials()
    })?;
    if !ok {
        return Err(invalid_credentials().into());
    }

    let seed = TokenSeed::new(user.id, user.email, user.user_type, user.tenant_id);
    let token = state.resolver.token_service().issue(&seed)?;

    tracing::info!(email = %seed.email, "user logged in");
    Ok(Json(LoginResponse { token }))
}

/// POST /auth/reseller/login — reseller partner login.
///
/// Credentials only; the approval state machine is enforced when the token
/// is resolved, so a pending partner gets a token but every request denies
/// with their status.
pub async fn reseller_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let partner = state
        .resellers
        .find_credentials_by_email(req.email.trim())
        .map_err(|e| {
            tracing::debug!(error = %e, "reseller lookup failed during login");
            invalid_credentials()
        })?
        .ok_or_else(invalid_credentials)?;

    if !partner.is_active {
        return Err(invalid_credentials().into());
    }
    let ok = verify_password(&req.password, &partner.password_hash).map_err(|e| {
        tracing::debug!(error = %e, "password verification failed during login");
        invalid_credentials()
    })?;
    if !ok {
        return Err(invalid_credentials().into());
    }

    let seed = TokenSeed::new(partner.id, partner.email, UserType::Reseller, None);
    let token = state.resolver.token_service().issue(&seed)?;

    tracing::info!(email = %seed.email, "reseller logged in");
    Ok(Json(LoginResponse { token }))
}

/// GET /auth/me — echo of the resolved principal.
pub async fn me(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}
