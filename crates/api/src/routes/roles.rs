//! Tenant-scoped role administration endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use nimbuscrm_admin::{NewRole, RoleQuery, RoleUpdate};
use nimbuscrm_auth::Principal;
use nimbuscrm_core::{Action, Feature, Role, RoleId, TenantId};
use nimbuscrm_store::Page;

use crate::errors::ApiResult;
use crate::guards;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/:role_id",
            get(get_role).put(update_role).delete(delete_role),
        )
}

/// Common gate: path-tenant isolation plus the feature permission.
fn gate<'a>(
    principal: &'a Principal,
    tenant_id: TenantId,
    action: &'static str,
) -> ApiResult<&'a nimbuscrm_auth::TenantPrincipal> {
    guards::verify_tenant_context(principal, Some(tenant_id))?;
    guards::require_feature_permission(
        principal,
        &Feature::new("role_management"),
        &Action::new(action),
    )?;
    Ok(guards::require_tenant_principal(principal)?)
}

/// POST /admin/roles — platform scope, no path tenant. The only HTTP path
/// where an omitted `tenant_id` means a system role rather than "the path
/// tenant".
pub async fn create_platform_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<NewRole>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    let actor = guards::require_saas_level(&principal)?;
    let role = state.role_admin.create_role(actor, input)?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn create_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<TenantId>,
    Json(mut input): Json<NewRole>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    let actor = gate(&principal, tenant_id, "create")?;

    // The path tenant is the default scope; the body may only restate it
    // (or, for platform staff, target it explicitly).
    if input.tenant_id.is_none() {
        input.tenant_id = Some(tenant_id);
    }

    let role = state.role_admin.create_role(actor, input)?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn list_roles(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<RoleQuery>,
) -> ApiResult<Json<Page<Role>>> {
    let actor = gate(&principal, tenant_id, "read")?;
    let page = state.role_admin.list_roles(actor, query)?;
    Ok(Json(page))
}

pub async fn get_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, role_id)): Path<(TenantId, RoleId)>,
) -> ApiResult<Json<Role>> {
    let actor = gate(&principal, tenant_id, "read")?;
    let role = state.role_admin.get_role(actor, role_id)?;
    Ok(Json(role))
}

pub async fn update_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, role_id)): Path<(TenantId, RoleId)>,
    Json(update): Json<RoleUpdate>,
) -> ApiResult<Json<Role>> {
    let actor = gate(&principal, tenant_id, "update")?;
    let role = state.role_admin.update_role(actor, role_id, update)?;
    Ok(Json(role))
}

pub async fn delete_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, role_id)): Path<(TenantId, RoleId)>,
) -> ApiResult<StatusCode> {
    let actor = gate(&principal, tenant_id, "delete")?;
    state.role_admin.delete_role(actor, role_id)?;
    Ok(StatusCode::NO_CONTENT)
}
