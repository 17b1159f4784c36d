//! Error taxonomy for the authorization core.

use thiserror::Error;

/// Result type used across the authorization layers.
pub type AuthResult<T> = Result<T, AuthError>;

/// Authorization-core error.
///
/// Denials are terminal for the attempt; nothing in this core retries.
/// Token-verification failures must always surface as the *generic*
/// [`AuthError::unauthenticated`] so callers cannot use error detail as a
/// token-validity oracle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing/invalid token, principal absent or deactivated, or a
    /// reseller that is not approved.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Insufficient permission, tenant mismatch, system-role protection,
    /// or a hierarchy violation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A uniqueness constraint was violated (e.g. duplicate role slug).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A role/group/user is absent within the caller's visibility scope.
    #[error("not found")]
    NotFound,

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A request payload failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Infrastructure fault outside the fail-closed normalization points.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// The one generic unauthenticated error. Expired, malformed and
    /// bad-signature tokens are indistinguishable through this constructor.
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated("authentication required".to_string())
    }

    /// Unauthenticated with a caller-visible reason (principal-state
    /// denials such as a non-approved reseller; never token detail).
    pub fn unauthenticated_because(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
