use super::{Repository, StoreError, StoreResult};
use crate::models::{
    Comment, CreateCommentRequest, CreatePhotoRequest, CreateSocialMediaRequest, NewUser, Photo,
    SocialMedia, UpdateCommentRequest, UpdatePhotoRequest, UpdateSocialMediaRequest,
    UpdateUserRequest, User,
};
use async_trait::async_trait;
use sqlx::PgPool;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, dob, created_at, updated_at, deleted_at";
const PHOTO_COLUMNS: &str = "id, title, caption, photo_url, user_id, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, message, photo_id, user_id, created_at, updated_at";
const SOCIAL_MEDIA_COLUMNS: &str =
    "id, name, social_media_url, user_id, created_at, updated_at";

/// PostgreSQL error code for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Separates unique-constraint violations from every other database failure.
fn classify(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            return StoreError::UniqueViolation(constraint);
        }
    }
    StoreError::Database(err)
}

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Every read filters `deleted_at IS NULL`; deletes only ever set `deleted_at`.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    /// find_user_by_email
    ///
    /// Exact, case-sensitive match on the stored email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id ASC");
        sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    /// insert_user
    ///
    /// The partial unique index on `email` turns a lost sign-up race into
    /// `StoreError::UniqueViolation`.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let query = format!(
            r#"INSERT INTO users (username, email, password_hash, dob, created_at, updated_at)
               VALUES ($1, $2, $3, $4, NOW(), NOW())
               RETURNING {USER_COLUMNS}"#
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.username)
            .bind(user.email)
            .bind(user.password_hash)
            .bind(user.dob)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    /// update_user
    ///
    /// Uses `COALESCE` so only the fields present in `req` are written.
    async fn update_user(&self, id: i64, req: UpdateUserRequest) -> StoreResult<Option<User>> {
        let query = format!(
            r#"UPDATE users
               SET username = COALESCE($2, username),
                   email = COALESCE($3, email),
                   updated_at = NOW()
               WHERE id = $1 AND deleted_at IS NULL
               RETURNING {USER_COLUMNS}"#
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(req.username)
            .bind(req.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn soft_delete_user(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    // --- PHOTOS ---

    async fn list_photos(&self) -> StoreResult<Vec<Photo>> {
        let query = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Photo>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn list_photos_by_user(&self, user_id: i64) -> StoreResult<Vec<Photo>> {
        let query = format!(
            r#"SELECT {PHOTO_COLUMNS} FROM photos
               WHERE user_id = $1 AND deleted_at IS NULL
               ORDER BY created_at DESC"#
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_photo_by_id(&self, id: i64) -> StoreResult<Option<Photo>> {
        let query =
            format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_photo(&self, user_id: i64, req: CreatePhotoRequest) -> StoreResult<Photo> {
        let query = format!(
            r#"INSERT INTO photos (title, caption, photo_url, user_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, NOW(), NOW())
               RETURNING {PHOTO_COLUMNS}"#
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(req.title)
            .bind(req.caption)
            .bind(req.photo_url)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update_photo(&self, id: i64, req: UpdatePhotoRequest) -> StoreResult<Option<Photo>> {
        let query = format!(
            r#"UPDATE photos
               SET title = COALESCE($2, title),
                   caption = COALESCE($3, caption),
                   photo_url = COALESCE($4, photo_url),
                   updated_at = NOW()
               WHERE id = $1 AND deleted_at IS NULL
               RETURNING {PHOTO_COLUMNS}"#
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .bind(req.title)
            .bind(req.caption)
            .bind(req.photo_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn soft_delete_photo(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE photos SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    // --- COMMENTS ---

    async fn list_comments(&self) -> StoreResult<Vec<Comment>> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE deleted_at IS NULL ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn list_comments_by_photo(&self, photo_id: i64) -> StoreResult<Vec<Comment>> {
        let query = format!(
            r#"SELECT {COMMENT_COLUMNS} FROM comments
               WHERE photo_id = $1 AND deleted_at IS NULL
               ORDER BY created_at ASC"#
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(photo_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_comment_by_id(&self, id: i64) -> StoreResult<Option<Comment>> {
        let query =
            format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_comment(
        &self,
        user_id: i64,
        req: CreateCommentRequest,
    ) -> StoreResult<Comment> {
        let query = format!(
            r#"INSERT INTO comments (message, photo_id, user_id, created_at, updated_at)
               VALUES ($1, $2, $3, NOW(), NOW())
               RETURNING {COMMENT_COLUMNS}"#
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(req.message)
            .bind(req.photo_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update_comment(
        &self,
        id: i64,
        req: UpdateCommentRequest,
    ) -> StoreResult<Option<Comment>> {
        let query = format!(
            r#"UPDATE comments
               SET message = $2, updated_at = NOW()
               WHERE id = $1 AND deleted_at IS NULL
               RETURNING {COMMENT_COLUMNS}"#
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(req.message)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn soft_delete_comment(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    // --- SOCIAL MEDIAS ---

    async fn list_social_medias_by_user(&self, user_id: i64) -> StoreResult<Vec<SocialMedia>> {
        let query = format!(
            r#"SELECT {SOCIAL_MEDIA_COLUMNS} FROM social_medias
               WHERE user_id = $1 AND deleted_at IS NULL
               ORDER BY created_at ASC"#
        );
        sqlx::query_as::<_, SocialMedia>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_social_media_by_id(&self, id: i64) -> StoreResult<Option<SocialMedia>> {
        let query = format!(
            "SELECT {SOCIAL_MEDIA_COLUMNS} FROM social_medias WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, SocialMedia>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_social_media(
        &self,
        user_id: i64,
        req: CreateSocialMediaRequest,
    ) -> StoreResult<SocialMedia> {
        let query = format!(
            r#"INSERT INTO social_medias (name, social_media_url, user_id, created_at, updated_at)
               VALUES ($1, $2, $3, NOW(), NOW())
               RETURNING {SOCIAL_MEDIA_COLUMNS}"#
        );
        sqlx::query_as::<_, SocialMedia>(&query)
            .bind(req.name)
            .bind(req.social_media_url)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update_social_media(
        &self,
        id: i64,
        req: UpdateSocialMediaRequest,
    ) -> StoreResult<Option<SocialMedia>> {
        let query = format!(
            r#"UPDATE social_medias
               SET name = COALESCE($2, name),
                   social_media_url = COALESCE($3, social_media_url),
                   updated_at = NOW()
               WHERE id = $1 AND deleted_at IS NULL
               RETURNING {SOCIAL_MEDIA_COLUMNS}"#
        );
        sqlx::query_as::<_, SocialMedia>(&query)
            .bind(id)
            .bind(req.name)
            .bind(req.social_media_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn soft_delete_social_media(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE social_medias SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
