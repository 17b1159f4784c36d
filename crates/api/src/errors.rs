//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use nimbuscrm_core::AuthError;

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

/// `?`-friendly wrapper so handlers can return engine errors directly.
pub struct ApiError(pub AuthError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        auth_error_to_response(self.0)
    }
}

/// Map an engine error to its HTTP rendition. The message is whatever the
/// engine decided to disclose; the boundary adds nothing.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::Unauthenticated(msg) => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", msg),
        AuthError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        AuthError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        AuthError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        AuthError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AuthError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error reached the boundary");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}
