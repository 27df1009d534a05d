use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Authenticated Router Module
///
/// Every route here sits behind `auth::require_bearer`, applied as a route layer in
/// `create_router`. Handlers read the caller from the request extensions as `AuthUser`.
///
/// PUT and DELETE on a single resource are owner-only. The check lives in
/// `ownership::authorize` and runs before the request body is parsed.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Users ---
        .route("/users", get(handlers::list_users))
        // PUT/DELETE only on the caller's own account.
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // --- Photos ---
        .route(
            "/photos",
            get(handlers::list_photos).post(handlers::create_photo),
        )
        // GET /photos/user?user_id=...
        // Static segment, matched ahead of `/photos/{id}`.
        .route("/photos/user", get(handlers::list_photos_by_user))
        .route(
            "/photos/{id}",
            get(handlers::get_photo)
                .put(handlers::update_photo)
                .delete(handlers::delete_photo),
        )
        // --- Comments ---
        // GET /comments?photo_id=...
        .route(
            "/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/comments/{id}",
            get(handlers::get_comment)
                .put(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
        // --- Social medias ---
        // GET /socialmedias?user_id=...
        .route(
            "/socialmedias",
            get(handlers::list_social_medias).post(handlers::create_social_media),
        )
        .route(
            "/socialmedias/{id}",
            get(handlers::get_social_media)
                .put(handlers::update_social_media)
                .delete(handlers::delete_social_media),
        )
}
