//! Bearer-token resolution middleware.
//!
//! Every protected route gets a fresh [`Principal`] in its request
//! extensions; handlers never see a raw token.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::errors;
use crate::state::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let authorization = header_str(req.headers());

    let principal = state
        .resolver
        .resolve(authorization)
        .map_err(errors::auth_error_to_response)?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

fn header_str(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}
