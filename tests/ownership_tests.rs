use axum::http::StatusCode;
use chrono::NaiveDate;
use photogram::{
    AppError, MemoryRepository,
    auth::AuthUser,
    models::{CreateCommentRequest, CreatePhotoRequest, CreateSocialMediaRequest, NewUser, User},
    ownership::{Action, authorize, parse_id},
    repository::Repository,
};

// --- Fixtures ---

fn session(id: i64) -> AuthUser {
    AuthUser {
        id,
        username: format!("user-{id}"),
        dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    }
}

async fn seed_user(repo: &MemoryRepository, email: &str) -> User {
    repo.insert_user(NewUser {
        username: email.split('@').next().unwrap_or_default().to_string(),
        email: email.to_string(),
        password_hash: "$2b$04$placeholder".to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    })
    .await
    .unwrap()
}

async fn seed_photo(repo: &MemoryRepository, owner: i64) -> i64 {
    repo.insert_photo(
        owner,
        CreatePhotoRequest {
            title: "sunset".to_string(),
            caption: String::new(),
            photo_url: "https://img.example.com/sunset.jpg".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// --- Id Parsing ---

#[test]
fn test_parse_id_accepts_only_positive_integers() {
    assert_eq!(parse_id("17").unwrap(), 17);
    for raw in ["0", "-3", "abc", "", "1.5"] {
        assert!(
            matches!(parse_id(raw), Err(AppError::BadRequest(_))),
            "{raw:?} should be rejected"
        );
    }
}

// --- Ownership Rule ---

#[tokio::test]
async fn test_owner_may_edit_and_delete() {
    let repo = MemoryRepository::new();
    let alice = seed_user(&repo, "alice@example.com").await;
    let photo_id = seed_photo(&repo, alice.id).await;

    for action in [Action::Edit, Action::Delete] {
        let photo = authorize(&photo_id.to_string(), Some(&session(alice.id)), action, |id| {
            repo.find_photo_by_id(id)
        })
        .await
        .unwrap();
        assert_eq!(photo.id, photo_id);
    }
}

#[tokio::test]
async fn test_stranger_is_forbidden() {
    let repo = MemoryRepository::new();
    let alice = seed_user(&repo, "alice@example.com").await;
    let bob = seed_user(&repo, "bob@example.com").await;
    let photo_id = seed_photo(&repo, alice.id).await;

    let err = authorize(
        &photo_id.to_string(),
        Some(&session(bob.id)),
        Action::Edit,
        |id| repo.find_photo_by_id(id),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.to_string(), "you are not authorized to edit this photo");
}

#[tokio::test]
async fn test_forbidden_message_names_kind_and_action() {
    let repo = MemoryRepository::new();
    let alice = seed_user(&repo, "alice@example.com").await;
    let bob = seed_user(&repo, "bob@example.com").await;
    let photo_id = seed_photo(&repo, alice.id).await;
    let social = repo
        .insert_social_media(
            alice.id,
            CreateSocialMediaRequest {
                name: "mastodon".to_string(),
                social_media_url: "https://mastodon.social/@alice".to_string(),
            },
        )
        .await
        .unwrap();
    let comment = repo
        .insert_comment(
            alice.id,
            CreateCommentRequest {
                message: "nice".to_string(),
                photo_id,
            },
        )
        .await
        .unwrap();

    let err = authorize(
        &social.id.to_string(),
        Some(&session(bob.id)),
        Action::Delete,
        |id| repo.find_social_media_by_id(id),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "you are not authorized to delete this social media");

    let err = authorize(
        &comment.id.to_string(),
        Some(&session(bob.id)),
        Action::Delete,
        |id| repo.find_comment_by_id(id),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "you are not authorized to delete this comment");
}

#[tokio::test]
async fn test_missing_resource_is_not_found_for_anyone() {
    let repo = MemoryRepository::new();
    let bob = seed_user(&repo, "bob@example.com").await;

    let err = authorize("9999", Some(&session(bob.id)), Action::Delete, |id| {
        repo.find_photo_by_id(id)
    })
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::NotFound("photo")));
}

#[tokio::test]
async fn test_soft_deleted_resource_is_not_found() {
    let repo = MemoryRepository::new();
    let alice = seed_user(&repo, "alice@example.com").await;
    let photo_id = seed_photo(&repo, alice.id).await;
    assert!(repo.soft_delete_photo(photo_id).await.unwrap());

    let err = authorize(
        &photo_id.to_string(),
        Some(&session(alice.id)),
        Action::Edit,
        |id| repo.find_photo_by_id(id),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_id_wins_over_missing_session() {
    let repo = MemoryRepository::new();

    let err = authorize("abc", None, Action::Edit, |id| repo.find_photo_by_id(id))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_session_is_unauthorized_before_lookup() {
    let repo = MemoryRepository::new();

    // The photo does not exist either; the session check comes first.
    let err = authorize("1", None, Action::Edit, |id| repo.find_photo_by_id(id))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

    let err = authorize("1", Some(&session(0)), Action::Edit, |id| {
        repo.find_photo_by_id(id)
    })
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_owns_own_account() {
    let repo = MemoryRepository::new();
    let alice = seed_user(&repo, "alice@example.com").await;
    let bob = seed_user(&repo, "bob@example.com").await;

    let me = authorize(&alice.id.to_string(), Some(&session(alice.id)), Action::Edit, |id| {
        repo.find_user_by_id(id)
    })
    .await
    .unwrap();
    assert_eq!(me.id, alice.id);

    let err = authorize(&alice.id.to_string(), Some(&session(bob.id)), Action::Delete, |id| {
        repo.find_user_by_id(id)
    })
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "you are not authorized to delete this user");
}
