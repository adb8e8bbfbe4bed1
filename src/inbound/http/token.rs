//! Bearer token issuance and verification.
//!
//! HS256 tokens carry the user id, email, and role; verification failures
//! collapse into a single `unauthorized` domain error so clients cannot
//! distinguish an expired token from a forged one.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User};

/// Token lifetime. Sessions are re-established daily in practice.
const TOKEN_TTL_HOURS: i64 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier.
    pub sub: i32,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenCodec {
    secret: String,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a signed token for an authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| Error::internal("failed to sign token"))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| Error::unauthorized("invalid or expired token"))
    }
}
