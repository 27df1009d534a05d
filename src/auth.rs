use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{NaiveDate, Utc};

use crate::{
    error::AppError,
    token::{SessionClaims, TokenService},
};

/// AuthUser
///
/// The authenticated session identity. It is produced exactly once per request by
/// [`require_bearer`] from a verified token and stored in the request extensions,
/// where handlers pick it up as a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Identity of the credential the token was issued for.
    pub id: i64,
    pub username: String,
    pub dob: NaiveDate,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.username,
            dob: claims.dob,
        }
    }
}

/// bearer_token
///
/// Pulls the raw token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))
}

/// require_bearer
///
/// Middleware guarding every non-public route. It verifies the bearer token against the
/// wall clock and inserts the resulting [`AuthUser`] into the request extensions.
/// Any failure short-circuits with 401 before a handler runs.
///
/// The token is not checked against the user table, so a token issued before its
/// account was deleted stays usable until it expires.
pub async fn require_bearer(
    State(tokens): State<TokenService>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let claims = tokens.verify(bearer_token(&parts)?, Utc::now()).map_err(|e| {
        tracing::warn!(error = %e, "rejected session token");
        AppError::from(e)
    })?;

    let user = AuthUser::from(claims);
    tracing::debug!(user_id = user.id, "authenticated request");
    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// AuthUser Extractor Implementation
///
/// Reads the session placed in the extensions by [`require_bearer`]. Rejects with 401
/// when the route was mounted without the middleware.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("invalid user session".to_string()))
    }
}

/// Lets handlers take `Option<AuthUser>` and leave the "no session" decision to the
/// ownership rule.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}
