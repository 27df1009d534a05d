use super::{Repository, StoreError, StoreResult};
use crate::models::{
    Comment, CreateCommentRequest, CreatePhotoRequest, CreateSocialMediaRequest, NewUser, Photo,
    SocialMedia, UpdateCommentRequest, UpdatePhotoRequest, UpdateSocialMediaRequest,
    UpdateUserRequest, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// A stored row plus its soft-delete marker.
#[derive(Clone)]
struct Row<T> {
    value: T,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T> Row<T> {
    fn live(value: T) -> Self {
        Self {
            value,
            deleted_at: None,
        }
    }

    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Default)]
struct Tables {
    users: Vec<Row<User>>,
    photos: Vec<Row<Photo>>,
    comments: Vec<Row<Comment>>,
    social_medias: Vec<Row<SocialMedia>>,
    last_id: i64,
}

impl Tables {
    // Identities start at 1 so zero stays the "absent" value.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

fn find_live<T: Clone>(rows: &[Row<T>], pred: impl Fn(&T) -> bool) -> Option<T> {
    rows.iter()
        .find(|row| row.is_live() && pred(&row.value))
        .map(|row| row.value.clone())
}

fn filter_live<T: Clone>(rows: &[Row<T>], pred: impl Fn(&T) -> bool) -> Vec<T> {
    rows.iter()
        .filter(|row| row.is_live() && pred(&row.value))
        .map(|row| row.value.clone())
        .collect()
}

fn find_live_mut<T>(rows: &mut [Row<T>], pred: impl Fn(&T) -> bool) -> Option<&mut Row<T>> {
    rows.iter_mut().find(|row| row.is_live() && pred(&row.value))
}

fn soft_delete<T>(rows: &mut [Row<T>], pred: impl Fn(&T) -> bool) -> bool {
    match find_live_mut(rows, pred) {
        Some(row) => {
            row.deleted_at = Some(Utc::now());
            true
        }
        None => false,
    }
}

/// MemoryRepository
///
/// An in-process `Repository` with the same visibility rules as Postgres: soft-deleted
/// rows are hidden and email is unique among live users. Backs the test suite.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(find_live(&tables.users, |u| u.email == email))
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(find_live(&tables.users, |u| u.id == id))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(filter_live(&tables.users, |_| true))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if find_live(&tables.users, |u| u.email == user.email).is_some() {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: tables.next_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            dob: user.dob,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.push(Row::live(created.clone()));
        Ok(created)
    }

    async fn update_user(&self, id: i64, req: UpdateUserRequest) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &req.email {
            if find_live(&tables.users, |u| &u.email == email && u.id != id).is_some() {
                return Err(StoreError::UniqueViolation("users_email_key".to_string()));
            }
        }
        Ok(find_live_mut(&mut tables.users, |u| u.id == id).map(|row| {
            if let Some(username) = req.username {
                row.value.username = username;
            }
            if let Some(email) = req.email {
                row.value.email = email;
            }
            row.value.updated_at = Utc::now();
            row.value.clone()
        }))
    }

    async fn soft_delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(soft_delete(&mut tables.users, |u| u.id == id))
    }

    async fn list_photos(&self) -> StoreResult<Vec<Photo>> {
        let tables = self.tables.read().await;
        Ok(filter_live(&tables.photos, |_| true))
    }

    async fn list_photos_by_user(&self, user_id: i64) -> StoreResult<Vec<Photo>> {
        let tables = self.tables.read().await;
        Ok(filter_live(&tables.photos, |p| p.user_id == user_id))
    }

    async fn find_photo_by_id(&self, id: i64) -> StoreResult<Option<Photo>> {
        let tables = self.tables.read().await;
        Ok(find_live(&tables.photos, |p| p.id == id))
    }

    async fn insert_photo(&self, user_id: i64, req: CreatePhotoRequest) -> StoreResult<Photo> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let photo = Photo {
            id: tables.next_id(),
            title: req.title,
            caption: req.caption,
            photo_url: req.photo_url,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.photos.push(Row::live(photo.clone()));
        Ok(photo)
    }

    async fn update_photo(&self, id: i64, req: UpdatePhotoRequest) -> StoreResult<Option<Photo>> {
        let mut tables = self.tables.write().await;
        Ok(find_live_mut(&mut tables.photos, |p| p.id == id).map(|row| {
            if let Some(title) = req.title {
                row.value.title = title;
            }
            if let Some(caption) = req.caption {
                row.value.caption = caption;
            }
            if let Some(photo_url) = req.photo_url {
                row.value.photo_url = photo_url;
            }
            row.value.updated_at = Utc::now();
            row.value.clone()
        }))
    }

    async fn soft_delete_photo(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(soft_delete(&mut tables.photos, |p| p.id == id))
    }

    async fn list_comments(&self) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(filter_live(&tables.comments, |_| true))
    }

    async fn list_comments_by_photo(&self, photo_id: i64) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(filter_live(&tables.comments, |c| c.photo_id == photo_id))
    }

    async fn find_comment_by_id(&self, id: i64) -> StoreResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(find_live(&tables.comments, |c| c.id == id))
    }

    async fn insert_comment(
        &self,
        user_id: i64,
        req: CreateCommentRequest,
    ) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let comment = Comment {
            id: tables.next_id(),
            message: req.message,
            photo_id: req.photo_id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(Row::live(comment.clone()));
        Ok(comment)
    }

    async fn update_comment(
        &self,
        id: i64,
        req: UpdateCommentRequest,
    ) -> StoreResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        Ok(find_live_mut(&mut tables.comments, |c| c.id == id).map(|row| {
            row.value.message = req.message;
            row.value.updated_at = Utc::now();
            row.value.clone()
        }))
    }

    async fn soft_delete_comment(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(soft_delete(&mut tables.comments, |c| c.id == id))
    }

    async fn list_social_medias_by_user(&self, user_id: i64) -> StoreResult<Vec<SocialMedia>> {
        let tables = self.tables.read().await;
        Ok(filter_live(&tables.social_medias, |s| s.user_id == user_id))
    }

    async fn find_social_media_by_id(&self, id: i64) -> StoreResult<Option<SocialMedia>> {
        let tables = self.tables.read().await;
        Ok(find_live(&tables.social_medias, |s| s.id == id))
    }

    async fn insert_social_media(
        &self,
        user_id: i64,
        req: CreateSocialMediaRequest,
    ) -> StoreResult<SocialMedia> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let social_media = SocialMedia {
            id: tables.next_id(),
            name: req.name,
            social_media_url: req.social_media_url,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.social_medias.push(Row::live(social_media.clone()));
        Ok(social_media)
    }

    async fn update_social_media(
        &self,
        id: i64,
        req: UpdateSocialMediaRequest,
    ) -> StoreResult<Option<SocialMedia>> {
        let mut tables = self.tables.write().await;
        Ok(find_live_mut(&mut tables.social_medias, |s| s.id == id).map(|row| {
            if let Some(name) = req.name {
                row.value.name = name;
            }
            if let Some(url) = req.social_media_url {
                row.value.social_media_url = url;
            }
            row.value.updated_at = Utc::now();
            row.value.clone()
        }))
    }

    async fn soft_delete_social_media(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(soft_delete(&mut tables.social_medias, |s| s.id == id))
    }
}
