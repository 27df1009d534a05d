use crate::models::{
    Comment, CreateCommentRequest, CreatePhotoRequest, CreateSocialMediaRequest, NewUser, Photo,
    SocialMedia, UpdateCommentRequest, UpdatePhotoRequest, UpdateSocialMediaRequest,
    UpdateUserRequest, User,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// StoreError
///
/// Failures surfaced by the persistence layer. A unique-constraint violation is kept
/// distinct so callers can translate it (e.g. into "email already exists").
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, so handlers and flows
/// work the same against Postgres or the in-memory store.
///
/// Finders return `None` for rows that do not exist **or** are soft-deleted. Updates
/// return `None` when the target row is gone, and soft deletes return whether a live
/// row was marked.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users (credential store) ---
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn update_user(&self, id: i64, req: UpdateUserRequest) -> StoreResult<Option<User>>;
    async fn soft_delete_user(&self, id: i64) -> StoreResult<bool>;

    // --- Photos ---
    async fn list_photos(&self) -> StoreResult<Vec<Photo>>;
    async fn list_photos_by_user(&self, user_id: i64) -> StoreResult<Vec<Photo>>;
    async fn find_photo_by_id(&self, id: i64) -> StoreResult<Option<Photo>>;
    async fn insert_photo(&self, user_id: i64, req: CreatePhotoRequest) -> StoreResult<Photo>;
    async fn update_photo(&self, id: i64, req: UpdatePhotoRequest) -> StoreResult<Option<Photo>>;
    async fn soft_delete_photo(&self, id: i64) -> StoreResult<bool>;

    // --- Comments ---
    async fn list_comments(&self) -> StoreResult<Vec<Comment>>;
    async fn list_comments_by_photo(&self, photo_id: i64) -> StoreResult<Vec<Comment>>;
    async fn find_comment_by_id(&self, id: i64) -> StoreResult<Option<Comment>>;
    async fn insert_comment(&self, user_id: i64, req: CreateCommentRequest)
    -> StoreResult<Comment>;
    async fn update_comment(
        &self,
        id: i64,
        req: UpdateCommentRequest,
    ) -> StoreResult<Option<Comment>>;
    async fn soft_delete_comment(&self, id: i64) -> StoreResult<bool>;

    // --- Social medias ---
    async fn list_social_medias_by_user(&self, user_id: i64) -> StoreResult<Vec<SocialMedia>>;
    async fn find_social_media_by_id(&self, id: i64) -> StoreResult<Option<SocialMedia>>;
    async fn insert_social_media(
        &self,
        user_id: i64,
        req: CreateSocialMediaRequest,
    ) -> StoreResult<SocialMedia>;
    async fn update_social_media(
        &self,
        id: i64,
        req: UpdateSocialMediaRequest,
    ) -> StoreResult<Option<SocialMedia>>;
    async fn soft_delete_social_media(&self, id: i64) -> StoreResult<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
