//! Stateless session tokens: HS256-signed JWTs with a one hour lifetime.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Issuer tag embedded in every token this service signs.
pub const ISSUER: &str = "photogram-api";
/// Audience tag embedded in every token this service signs.
pub const AUDIENCE: &str = "photogram-clients";
/// Purpose tag carried in the `sub` claim.
pub const SUBJECT: &str = "access-token";

/// How long an issued token stays valid.
pub fn token_lifetime() -> Duration {
    Duration::hours(1)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign session token: {0}")]
    Signing(String),
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token is malformed")]
    Malformed,
}

/// SessionClaims
///
/// The signed payload of a session token. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    /// Unique token id. Never tracked server-side.
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub user_id: i64,
    pub username: String,
    pub dob: NaiveDate,
}

/// TokenService
///
/// Issues and verifies session tokens with a secret handed in at construction.
/// Holds no mutable state, so clones can be shared freely across request tasks.
#[derive(Clone)]
pub struct TokenService {
    keys: Option<(EncodingKey, DecodingKey)>,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("has_secret", &self.keys.is_some())
            .finish()
    }
}

impl TokenService {
    /// An empty secret produces a service that refuses to sign or verify anything.
    pub fn new(secret: &str) -> Self {
        let keys = (!secret.is_empty()).then(|| {
            (
                EncodingKey::from_secret(secret.as_bytes()),
                DecodingKey::from_secret(secret.as_bytes()),
            )
        });

        // Time bounds are checked against the caller's clock in `verify`, not the library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.sub = Some(SUBJECT.to_string());
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "aud", "sub"]);

        Self { keys, validation }
    }

    /// issue
    ///
    /// Builds a fresh claim set valid from `now` (truncated to the second) for one hour
    /// and signs it.
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        dob: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let (encoding_key, _) = self
            .keys
            .as_ref()
            .ok_or_else(|| TokenError::Signing("signing secret unavailable".to_string()))?;

        let issued_at = now.timestamp();
        let claims = SessionClaims {
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            sub: SUBJECT.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at + token_lifetime().num_seconds(),
            user_id,
            username: username.to_string(),
            dob,
        };

        encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// verify
    ///
    /// Checks the signature and the system tags, then the validity window
    /// `[nbf, exp)` against `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let (_, decoding_key) = self
            .keys
            .as_ref()
            .ok_or_else(|| TokenError::Signing("signing secret unavailable".to_string()))?;

        let claims = decode::<SessionClaims>(token, decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        let now = now.timestamp();
        if now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
