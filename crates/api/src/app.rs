//! Router assembly.

use axum::Router;

use crate::middleware;
use crate::routes;
use crate::state::AppState;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// integration tests).
pub fn build_app(state: AppState) -> Router {
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth_middleware,
    ));

    routes::public_router().merge(protected).with_state(state)
}
