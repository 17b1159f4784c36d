//! Session token issue/verify (HS256 signed claims with expiry).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nimbuscrm_core::{AuthError, AuthResult, TenantId, UserType};

/// Signed claims carried by a session token.
///
/// `tenant` is always a plain identifier, never a populated object —
/// anything heavier would go stale the moment roles are edited and bloat
/// every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: a user id or a reseller id depending on `user_type`.
    pub sub: Uuid,
    pub email: String,
    pub user_type: UserType,
    pub tenant: Option<TenantId>,
    pub iat: i64,
    pub exp: i64,
}

/// The minimal identity snapshot a token is minted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSeed {
    pub id: Uuid,
    pub email: String,
    pub user_type: UserType,
    pub tenant: Option<TenantId>,
}

impl TokenSeed {
    pub fn new(
        id: impl Into<Uuid>,
        email: impl Into<String>,
        user_type: UserType,
        tenant: Option<TenantId>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            user_type,
            tenant,
        }
    }
}

/// Issues and verifies signed session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            validation,
        }
    }

    /// Mint a token for `seed`. Only the plain tenant identifier is encoded.
    pub fn issue(&self, seed: &TokenSeed) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: seed.id,
            email: seed.email.clone(),
            user_type: seed.user_type,
            tenant: seed.tenant,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::internal(format!("token signing: {e}")))
    }

    /// Verify signature and expiry and return the claims.
    ///
    /// Every failure mode (bad signature, expiry, malformed payload) maps to
    /// the same generic unauthenticated error so callers cannot probe which
    /// check a token failed.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token verification failed");
                AuthError::unauthenticated()
            })
    }
}
