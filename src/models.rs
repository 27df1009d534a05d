use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::Validate;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The credential record stored in the `users` table. Carries the password hash,
/// so it is never serialized directly; handlers respond with [`UserView`].
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Soft-delete marker. Rows with a value are invisible to every finder.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// NewUser
///
/// Insert payload produced by the sign-up flow once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub dob: NaiveDate,
}

/// UserView
///
/// Public projection of a [`User`] without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[ts(type = "string")]
    pub dob: NaiveDate,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            dob: user.dob,
        }
    }
}

/// Photo
///
/// A photo record from the `photos` table. `user_id` is the owner, fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Comment
///
/// A comment left on a photo, from the `comments` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Comment {
    pub id: i64,
    pub message: String,
    pub photo_id: i64,
    pub user_id: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// SocialMedia
///
/// A link to one of the user's external social-media profiles.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct SocialMedia {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// --- Request Payloads (Input Schemas) ---

/// SignUpRequest
///
/// Input payload for `POST /users/register`. `dob` is a `YYYY-MM-DD` string and is
/// parsed by the sign-up flow so that a bad date maps to its own error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[schema(example = "2000-01-31")]
    pub dob: String,
}

/// LoginRequest
///
/// Input payload for `POST /users/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// TokenResponse
///
/// Output of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

/// UpdateUserRequest
///
/// Partial update of the caller's own account. Omitted fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "username cannot be empty"))]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
}

/// CreatePhotoRequest
///
/// Input payload for `POST /photos`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePhotoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub photo_url: String,
}

impl CreatePhotoRequest {
    /// Title and photo URL are both required; the message names whichever is missing.
    pub fn validate(&self) -> Result<(), &'static str> {
        match (self.title.trim().is_empty(), self.photo_url.trim().is_empty()) {
            (true, true) => Err("title and photo url cannot be empty"),
            (true, false) => Err("title cannot be empty"),
            (false, true) => Err("photo url cannot be empty"),
            (false, false) => Ok(()),
        }
    }
}

/// UpdatePhotoRequest
///
/// Partial update payload for `PUT /photos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdatePhotoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "photo url cannot be empty"))]
    pub photo_url: Option<String>,
}

/// CreateCommentRequest
///
/// Input payload for `POST /comments`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "message cannot be empty"))]
    pub message: String,
    pub photo_id: i64,
}

/// UpdateCommentRequest
///
/// Input payload for `PUT /comments/{id}`. Only the message is editable.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "message cannot be empty"))]
    pub message: String,
}

/// CreateSocialMediaRequest
///
/// Input payload for `POST /socialmedias`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateSocialMediaRequest {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(url(message = "social media url must be a valid url"))]
    pub social_media_url: String,
}

/// UpdateSocialMediaRequest
///
/// Partial update payload for `PUT /socialmedias/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateSocialMediaRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "social media url must be a valid url"))]
    pub social_media_url: Option<String>,
}
