//! Owner-only edit and delete rule shared by every mutable resource.

use std::{fmt, future::Future};

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::{Comment, Photo, SocialMedia, User},
    repository::StoreResult,
};

/// A stored resource with a single owning user.
pub trait OwnedResource {
    /// Name used in "not found" and "not authorized" messages.
    const KIND: &'static str;

    fn id(&self) -> i64;
    fn owner_id(&self) -> i64;
}

impl OwnedResource for Photo {
    const KIND: &'static str = "photo";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl OwnedResource for Comment {
    const KIND: &'static str = "comment";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl OwnedResource for SocialMedia {
    const KIND: &'static str = "social media";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

// An account is owned by itself.
impl OwnedResource for User {
    const KIND: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Edit => f.write_str("edit"),
            Action::Delete => f.write_str("delete"),
        }
    }
}

/// parse_id
///
/// Accepts a positive decimal identity; anything else is a 400.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("invalid required param".to_string()))
}

/// authorize
///
/// Decides whether `session` may perform `action` on the resource named by `raw_id`.
///
/// The checks run in a fixed order and stop at the first failure:
/// 1. `raw_id` must be a positive integer (400).
/// 2. A session must be present (401).
/// 3. The resource must exist and be live (404).
/// 4. The session must own it (403).
///
/// On success the loaded resource is returned so the caller does not fetch it twice.
pub async fn authorize<R, F, Fut>(
    raw_id: &str,
    session: Option<&AuthUser>,
    action: Action,
    load: F,
) -> Result<R, AppError>
where
    R: OwnedResource,
    F: FnOnce(i64) -> Fut,
    Fut: Future<Output = StoreResult<Option<R>>>,
{
    let id = parse_id(raw_id)?;

    let session = session
        .filter(|user| user.id > 0)
        .ok_or_else(|| AppError::Unauthorized("invalid user session".to_string()))?;

    let resource = load(id)
        .await?
        .filter(|resource| resource.id() != 0)
        .ok_or(AppError::NotFound(R::KIND))?;

    if resource.owner_id() != session.id {
        tracing::warn!(
            user_id = session.id,
            resource_id = id,
            kind = R::KIND,
            %action,
            "ownership check failed"
        );
        return Err(AppError::Forbidden(format!(
            "you are not authorized to {action} this {}",
            R::KIND
        )));
    }

    Ok(resource)
}

/// bind_json
///
/// Deserializes a JSON body that was taken as raw bytes. Mutating handlers read the
/// body this way so that the payload is only interpreted after [`authorize`] passes.
pub fn bind_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected request body");
        AppError::BadRequest("invalid request body".to_string())
    })
}
