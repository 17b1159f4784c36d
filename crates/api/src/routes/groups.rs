//! Tenant-scoped group administration endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use nimbuscrm_admin::{GroupUpdate, NewGroup};
use nimbuscrm_auth::Principal;
use nimbuscrm_core::{Action, Feature, Group, GroupId, TenantId};

use crate::errors::ApiResult;
use crate::guards;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route(
            "/:group_id",
            get(get_group).put(update_group).delete(delete_group),
        )
}

fn gate<'a>(
    principal: &'a Principal,
    tenant_id: TenantId,
    action: &'static str,
) -> ApiResult<&'a nimbuscrm_auth::TenantPrincipal> {
    guards::verify_tenant_context(principal, Some(tenant_id))?;
    guards::require_feature_permission(
        principal,
        &Feature::new("group_management"),
        &Action::new(action),
    )?;
    Ok(guards::require_tenant_principal(principal)?)
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<TenantId>,
    Json(mut input): Json<NewGroup>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    let actor = gate(&principal, tenant_id, "create")?;

    if input.tenant_id.is_none() {
        input.tenant_id = Some(tenant_id);
    }

    let group = state.group_admin.create_group(actor, input)?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn list_groups(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<Vec<Group>>> {
    let actor = gate(&principal, tenant_id, "read")?;
    let groups = state.group_admin.list_groups(actor, Some(tenant_id))?;
    Ok(Json(groups))
}

pub async fn get_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, group_id)): Path<(TenantId, GroupId)>,
) -> ApiResult<Json<Group>> {
    let actor = gate(&principal, tenant_id, "read")?;
    let group = state.group_admin.get_group(actor, group_id)?;
    Ok(Json(group))
}

pub async fn update_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, group_id)): Path<(TenantId, GroupId)>,
    Json(update): Json<GroupUpdate>,
) -> ApiResult<Json<Group>> {
    let actor = gate(&principal, tenant_id, "update")?;
    let group = state.group_admin.update_group(actor, group_id, update)?;
    Ok(Json(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, group_id)): Path<(TenantId, GroupId)>,
) -> ApiResult<StatusCode> {
    let actor = gate(&principal, tenant_id, "delete")?;
    state.group_admin.delete_group(actor, group_id)?;
    Ok(StatusCode::NO_CONTENT)
}
