use crate::{
    AppState, accounts,
    auth::AuthUser,
    error::AppError,
    models::{
        Comment, CreateCommentRequest, CreatePhotoRequest, CreateSocialMediaRequest,
        LoginRequest, Photo, SignUpRequest, SocialMedia, TokenResponse, UpdateCommentRequest,
        UpdatePhotoRequest, UpdateSocialMediaRequest, UpdateUserRequest, UserView,
    },
    ownership::{self, Action, authorize, bind_json},
    repository::StoreError,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

// --- Filter Structs ---

/// UserFilter
///
/// Query parameters for listings scoped to one owner (`/photos/user`, `/socialmedias`).
/// Kept as a raw string so that a missing and a malformed value get different messages.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct UserFilter {
    /// Identity of the owning user.
    pub user_id: Option<String>,
}

/// PhotoFilter
///
/// Optional `photo_id` filter for `GET /comments`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PhotoFilter {
    pub photo_id: Option<String>,
}

fn required_query_id(raw: Option<&str>, label: &str) -> Result<i64, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{label} ID is required")))?;
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {} ID", label.to_lowercase())))
}

// --- Users ---

/// register_user
///
/// [Public Route] Creates a new credential. Responds `201 {"user": ...}` without the
/// password hash.
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User Registered", body = UserView),
        (status = 400, description = "Validation Failed"),
        (status = 409, description = "Email Already Registered")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(payload) = payload?;
    let user = accounts::sign_up(state.repo.as_ref(), &state.hasher, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// login_user
///
/// [Public Route] Exchanges an email/password pair for a one hour session token.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token Issued", body = TokenResponse),
        (status = 401, description = "Wrong Password"),
        (status = 404, description = "Unknown Email")
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(payload) = payload?;
    let token = accounts::login(
        state.repo.as_ref(),
        &state.hasher,
        &state.tokens,
        payload,
        Utc::now(),
    )
    .await?;
    Ok(Json(TokenResponse { token }))
}

#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "Users", body = [UserView]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, AppError> {
    let users = state.repo.list_users().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    responses(
        (status = 200, description = "User", body = UserView),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, AppError> {
    let id = ownership::parse_id(&id)?;
    let user = state
        .repo
        .find_user_by_id(id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    Ok(Json(UserView::from(user)))
}

/// update_user
///
/// [Authenticated Route] Edits the caller's own account. An account owns itself, so
/// the ownership rule rejects edits to anyone else with 403.
#[utoipa::path(
    put,
    path = "/users/{id}",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserView),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Email Already Registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<UserView>, AppError> {
    let user = authorize(&id, session.as_ref(), Action::Edit, |id| {
        state.repo.find_user_by_id(id)
    })
    .await?;

    let payload: UpdateUserRequest = bind_json(&body)?;
    payload.validate()?;

    let updated = state
        .repo
        .update_user(user.id, payload)
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => AppError::EmailTaken,
            other => AppError::Store(other),
        })?
        .ok_or(AppError::UserNotFound)?;
    Ok(Json(UserView::from(updated)))
}

/// delete_user
///
/// [Authenticated Route] Soft-deletes the caller's own account. Tokens already issued
/// for it keep working until they expire.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = authorize(&id, session.as_ref(), Action::Delete, |id| {
        state.repo.find_user_by_id(id)
    })
    .await?;

    if !state.repo.soft_delete_user(user.id).await? {
        return Err(AppError::UserNotFound);
    }
    tracing::info!(user_id = user.id, "account deleted");
    Ok(Json(json!({
        "user": UserView::from(user),
        "message": "Your account has been successfully deleted",
    })))
}

// --- Photos ---

#[utoipa::path(
    get,
    path = "/photos",
    responses((status = 200, description = "Photos", body = [Photo]))
)]
pub async fn list_photos(State(state): State<AppState>) -> Result<Json<Vec<Photo>>, AppError> {
    Ok(Json(state.repo.list_photos().await?))
}

/// list_photos_by_user
///
/// [Authenticated Route] Photos owned by `?user_id=`. An empty result is a 404.
#[utoipa::path(
    get,
    path = "/photos/user",
    params(UserFilter),
    responses(
        (status = 200, description = "Photos", body = [Photo]),
        (status = 400, description = "Missing Or Invalid user_id"),
        (status = 404, description = "No Photos")
    )
)]
pub async fn list_photos_by_user(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<Photo>>, AppError> {
    let user_id = required_query_id(filter.user_id.as_deref(), "User")?;
    let photos = state.repo.list_photos_by_user(user_id).await?;
    if photos.is_empty() {
        return Err(AppError::NotFound("photo"));
    }
    Ok(Json(photos))
}

#[utoipa::path(
    get,
    path = "/photos/{id}",
    responses(
        (status = 200, description = "Photo", body = Photo),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Photo>, AppError> {
    let id = ownership::parse_id(&id)?;
    let photo = state
        .repo
        .find_photo_by_id(id)
        .await?
        .ok_or(AppError::NotFound("photo"))?;
    Ok(Json(photo))
}

/// create_photo
///
/// [Authenticated Route] Posts a photo owned by the caller.
#[utoipa::path(
    post,
    path = "/photos",
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo Created", body = Photo),
        (status = 400, description = "Missing Title Or URL")
    )
)]
pub async fn create_photo(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreatePhotoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Photo>), AppError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|message| AppError::BadRequest(message.to_string()))?;
    let photo = state.repo.insert_photo(user_id, payload).await?;
    tracing::info!(user_id, photo_id = photo.id, "photo created");
    Ok((StatusCode::CREATED, Json(photo)))
}

/// update_photo
///
/// [Authenticated Route] Owner-only edit. The body is read only after the ownership
/// check passes, so a stranger's malformed body still gets 403.
#[utoipa::path(
    put,
    path = "/photos/{id}",
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Updated", body = Photo),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_photo(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Photo>, AppError> {
    let photo = authorize(&id, session.as_ref(), Action::Edit, |id| {
        state.repo.find_photo_by_id(id)
    })
    .await?;

    let payload: UpdatePhotoRequest = bind_json(&body)?;
    payload.validate()?;

    let updated = state
        .repo
        .update_photo(photo.id, payload)
        .await?
        .ok_or(AppError::NotFound("photo"))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/photos/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let photo = authorize(&id, session.as_ref(), Action::Delete, |id| {
        state.repo.find_photo_by_id(id)
    })
    .await?;

    if !state.repo.soft_delete_photo(photo.id).await? {
        return Err(AppError::NotFound("photo"));
    }
    Ok(Json(json!({
        "photo": photo,
        "message": "Your photo has been successfully deleted",
    })))
}

// --- Comments ---

/// list_comments
///
/// [Authenticated Route] All comments, or only those on `?photo_id=`. A filtered
/// listing that comes back empty is a 404.
#[utoipa::path(
    get,
    path = "/comments",
    params(PhotoFilter),
    responses(
        (status = 200, description = "Comments", body = [Comment]),
        (status = 400, description = "Invalid photo_id"),
        (status = 404, description = "No Comments On Photo")
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(filter): Query<PhotoFilter>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let Some(raw) = filter.photo_id.as_deref() else {
        return Ok(Json(state.repo.list_comments().await?));
    };

    let photo_id = required_query_id(Some(raw), "Photo")?;
    let comments = state.repo.list_comments_by_photo(photo_id).await?;
    if comments.is_empty() {
        return Err(AppError::NotFound("comment"));
    }
    Ok(Json(comments))
}

#[utoipa::path(
    get,
    path = "/comments/{id}",
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Comment>, AppError> {
    let id = ownership::parse_id(&id)?;
    let comment = state
        .repo
        .find_comment_by_id(id)
        .await?
        .ok_or(AppError::NotFound("comment"))?;
    Ok(Json(comment))
}

/// create_comment
///
/// [Authenticated Route] Comments on a live photo. Commenting on a missing or deleted
/// photo is a 404.
#[utoipa::path(
    post,
    path = "/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment Created", body = Comment),
        (status = 404, description = "Photo Not Found")
    )
)]
pub async fn create_comment(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    if state.repo.find_photo_by_id(payload.photo_id).await?.is_none() {
        return Err(AppError::NotFound("photo"));
    }

    let comment = state.repo.insert_comment(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    put,
    path = "/comments/{id}",
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated", body = Comment),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Comment>, AppError> {
    let comment = authorize(&id, session.as_ref(), Action::Edit, |id| {
        state.repo.find_comment_by_id(id)
    })
    .await?;

    let payload: UpdateCommentRequest = bind_json(&body)?;
    payload.validate()?;

    let updated = state
        .repo
        .update_comment(comment.id, payload)
        .await?
        .ok_or(AppError::NotFound("comment"))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let comment = authorize(&id, session.as_ref(), Action::Delete, |id| {
        state.repo.find_comment_by_id(id)
    })
    .await?;

    if !state.repo.soft_delete_comment(comment.id).await? {
        return Err(AppError::NotFound("comment"));
    }
    Ok(Json(json!({
        "comment": comment,
        "message": "Your comment has been successfully deleted",
    })))
}

// --- Social medias ---

/// list_social_medias
///
/// [Authenticated Route] Social-media links of `?user_id=`. Requires the filter; an
/// empty result is a 404.
#[utoipa::path(
    get,
    path = "/socialmedias",
    params(UserFilter),
    responses(
        (status = 200, description = "Social Medias", body = [SocialMedia]),
        (status = 400, description = "Missing Or Invalid user_id"),
        (status = 404, description = "No Social Medias")
    )
)]
pub async fn list_social_medias(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<SocialMedia>>, AppError> {
    let user_id = required_query_id(filter.user_id.as_deref(), "User")?;
    let social_medias = state.repo.list_social_medias_by_user(user_id).await?;
    if social_medias.is_empty() {
        return Err(AppError::NotFound("social media"));
    }
    Ok(Json(social_medias))
}

#[utoipa::path(
    get,
    path = "/socialmedias/{id}",
    responses(
        (status = 200, description = "Social Media", body = SocialMedia),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_social_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SocialMedia>, AppError> {
    let id = ownership::parse_id(&id)?;
    let social_media = state
        .repo
        .find_social_media_by_id(id)
        .await?
        .ok_or(AppError::NotFound("social media"))?;
    Ok(Json(social_media))
}

#[utoipa::path(
    post,
    path = "/socialmedias",
    request_body = CreateSocialMediaRequest,
    responses(
        (status = 201, description = "Social Media Created", body = SocialMedia),
        (status = 400, description = "Validation Failed")
    )
)]
pub async fn create_social_media(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateSocialMediaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SocialMedia>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let social_media = state.repo.insert_social_media(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(social_media)))
}

#[utoipa::path(
    put,
    path = "/socialmedias/{id}",
    request_body = UpdateSocialMediaRequest,
    responses(
        (status = 200, description = "Updated", body = SocialMedia),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_social_media(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SocialMedia>, AppError> {
    let social_media = authorize(&id, session.as_ref(), Action::Edit, |id| {
        state.repo.find_social_media_by_id(id)
    })
    .await?;

    let payload: UpdateSocialMediaRequest = bind_json(&body)?;
    payload.validate()?;

    let updated = state
        .repo
        .update_social_media(social_media.id, payload)
        .await?
        .ok_or(AppError::NotFound("social media"))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/socialmedias/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_social_media(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let social_media = authorize(&id, session.as_ref(), Action::Delete, |id| {
        state.repo.find_social_media_by_id(id)
    })
    .await?;

    if !state.repo.soft_delete_social_media(social_media.id).await? {
        return Err(AppError::NotFound("social media"));
    }
    Ok(Json(json!({
        "social_media": social_media,
        "message": "Your social media has been successfully deleted",
    })))
}
