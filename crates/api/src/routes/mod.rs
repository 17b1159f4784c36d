use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub mod groups;
pub mod roles;
pub mod session;
pub mod system;
pub mod users;

/// Router for everything behind the auth middleware.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(session::me))
        .nest("/tenants/:tenant_id/roles", roles::router())
        .nest("/tenants/:tenant_id/groups", groups::router())
        .route(
            "/tenants/:tenant_id/users/:user_id",
            delete(users::delete_user),
        )
        // Platform scope: system roles have no tenant, so creation cannot
        // go through a tenant path.
        .route("/admin/roles", post(roles::create_platform_role))
}

/// Unauthenticated surface: liveness and the two login endpoints.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/login", post(session::login))
        .route("/auth/reseller/login", post(session::reseller_login))
}
