use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{domain::Id, error::AppError, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("missing Authorization header")]
    Missing,
    #[error("invalid Authorization header")]
    Malformed,
    #[error("invalid or expired token")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::unauthorized(e.to_string())
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.jwt;
        Self::new(&cfg.secret, Duration::from_secs(cfg.ttl_minutes * 60))
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn sign(&self, user_id: Id) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(%user_id, "jwt signed");
        Ok(token)
    }

    /// Only HMAC-signed tokens are accepted; the subject must be a UUID.
    pub fn verify(&self, token: &str) -> Result<Id, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            TokenError::Invalid
        })?;
        let user_id = Id::parse(&data.claims.sub).map_err(|_| TokenError::Invalid)?;
        debug!(%user_id, "jwt verified");
        Ok(user_id)
    }
}

/// Authenticated caller, taken from a `Bearer` token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Id);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(TokenError::Missing)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::Malformed)?;

        let user_id = keys.verify(token).map_err(|e| {
            warn!("invalid or expired token");
            e
        })?;
        Ok(AuthUser(user_id))
    }
}
