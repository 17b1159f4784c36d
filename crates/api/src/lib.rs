//! `nimbuscrm-api` — HTTP boundary of the authorization core.
//!
//! Route handlers stay thin: the auth middleware resolves a [`Principal`]
//! per request, the guard helpers gate it, and the admin services do the
//! work. Structured like the rest of the workspace:
//! - `middleware.rs`: bearer-token resolution into request extensions
//! - `guards.rs`: route-boundary gates (type, tenant, feature permission)
//! - `routes/`: handlers, one file per surface
//! - `errors.rs`: consistent JSON error responses
//!
//! [`Principal`]: nimbuscrm_auth::Principal

pub mod app;
pub mod errors;
pub mod guards;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::build_app;
pub use state::AppState;
