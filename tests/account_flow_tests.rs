use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use photogram::{
    AppError, MemoryRepository, PasswordHasher, TokenService,
    accounts::{self, MIN_AGE, MIN_PASSWORD_LEN, age_on},
    config::MIN_BCRYPT_COST,
    models::{LoginRequest, SignUpRequest},
    repository::Repository,
};

// --- Test Fixtures ---

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
}

fn hasher() -> PasswordHasher {
    PasswordHasher::new(MIN_BCRYPT_COST)
}

fn sign_up_request(email: &str, password: &str, dob: &str) -> SignUpRequest {
    SignUpRequest {
        username: "alice".to_string(),
        password: password.to_string(),
        email: email.to_string(),
        dob: dob.to_string(),
    }
}

async fn register(repo: &MemoryRepository, email: &str, password: &str) {
    accounts::sign_up(
        repo,
        &hasher(),
        sign_up_request(email, password, "1990-01-01"),
        now(),
    )
    .await
    .expect("fixture registration should succeed");
}

// --- Age Calculation ---

#[test]
fn test_age_counts_whole_years() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

    assert_eq!(age_on(NaiveDate::from_ymd_opt(2016, 3, 15).unwrap(), today), 8);
    assert_eq!(age_on(NaiveDate::from_ymd_opt(2016, 3, 16).unwrap(), today), 7);
    assert_eq!(age_on(NaiveDate::from_ymd_opt(2015, 12, 31).unwrap(), today), 8);
}

// --- Sign-Up Flow ---

#[tokio::test]
async fn test_sign_up_returns_view_and_stores_hash() {
    let repo = MemoryRepository::new();
    let view = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("alice@example.com", "secret123", "1990-01-01"),
        now(),
    )
    .await
    .unwrap();

    assert!(view.id > 0);
    assert_eq!(view.email, "alice@example.com");
    assert_eq!(view.dob, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());

    let stored = repo
        .find_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "secret123");
    assert!(hasher().verify("secret123", &stored.password_hash).unwrap());
}

#[tokio::test]
async fn test_sign_up_accepts_exactly_minimum_age() {
    let repo = MemoryRepository::new();
    let result = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("kid@example.com", "secret123", "2016-03-15"),
        now(),
    )
    .await;

    assert!(result.is_ok(), "eighth birthday today is old enough");
}

#[tokio::test]
async fn test_sign_up_rejects_one_day_short_of_minimum_age() {
    let repo = MemoryRepository::new();
    let result = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("kid@example.com", "secret123", "2016-03-16"),
        now(),
    )
    .await;

    assert!(matches!(result, Err(AppError::AgeRestriction { min }) if min == MIN_AGE));
    assert!(repo.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sign_up_password_length_boundary() {
    let repo = MemoryRepository::new();

    let short = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("a@example.com", "12345", "1990-01-01"),
        now(),
    )
    .await;
    assert!(matches!(short, Err(AppError::WeakPassword { min }) if min == MIN_PASSWORD_LEN));

    let exact = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("a@example.com", "123456", "1990-01-01"),
        now(),
    )
    .await;
    assert!(exact.is_ok());
}

#[tokio::test]
async fn test_sign_up_reports_invalid_date_first() {
    let repo = MemoryRepository::new();
    // Every field is bad; the date is checked first.
    let result = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("not-an-email", "1", "15/03/1990"),
        now(),
    )
    .await;

    assert!(matches!(result, Err(AppError::InvalidDate)));
}

#[tokio::test]
async fn test_sign_up_checks_age_before_password() {
    let repo = MemoryRepository::new();
    let result = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("not-an-email", "1", "2020-01-01"),
        now(),
    )
    .await;

    assert!(matches!(result, Err(AppError::AgeRestriction { .. })));
}

#[tokio::test]
async fn test_sign_up_rejects_invalid_email() {
    let repo = MemoryRepository::new();
    let result = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("alice-at-example.com", "secret123", "1990-01-01"),
        now(),
    )
    .await;

    assert!(matches!(result, Err(AppError::InvalidEmail)));
}

#[tokio::test]
async fn test_sign_up_rejects_blank_username() {
    let repo = MemoryRepository::new();
    let mut request = sign_up_request("alice@example.com", "secret123", "1990-01-01");
    request.username = "   ".to_string();

    let result = accounts::sign_up(&repo, &hasher(), request, now()).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_sign_up_rejects_duplicate_email() {
    let repo = MemoryRepository::new();
    register(&repo, "alice@example.com", "secret123").await;

    let second = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("alice@example.com", "another-pass", "1985-07-04"),
        now(),
    )
    .await;

    assert!(matches!(second, Err(AppError::EmailTaken)));
    assert_eq!(repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_email_reusable_after_soft_delete() {
    let repo = MemoryRepository::new();
    register(&repo, "alice@example.com", "secret123").await;
    let user = repo
        .find_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(repo.soft_delete_user(user.id).await.unwrap());

    let again = accounts::sign_up(
        &repo,
        &hasher(),
        sign_up_request("alice@example.com", "secret123", "1990-01-01"),
        now(),
    )
    .await;
    assert!(again.is_ok());
}

// --- Login Flow ---

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let repo = MemoryRepository::new();
    register(&repo, "alice@example.com", "secret123").await;
    let tokens = TokenService::new("flow-secret");

    let token = accounts::login(
        &repo,
        &hasher(),
        &tokens,
        LoginRequest {
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        },
        now(),
    )
    .await
    .unwrap();

    let claims = tokens.verify(&token, now()).unwrap();
    let stored = repo
        .find_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claims.user_id, stored.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.dob, stored.dob);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let repo = MemoryRepository::new();
    register(&repo, "alice@example.com", "secret123").await;

    let result = accounts::login(
        &repo,
        &hasher(),
        &TokenService::new("flow-secret"),
        LoginRequest {
            email: "alice@example.com".to_string(),
            password: "wrong-password".to_string(),
        },
        now(),
    )
    .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let repo = MemoryRepository::new();

    let result = accounts::login(
        &repo,
        &hasher(),
        &TokenService::new("flow-secret"),
        LoginRequest {
            email: "ghost@example.com".to_string(),
            password: "secret123".to_string(),
        },
        now(),
    )
    .await;

    assert!(matches!(result, Err(AppError::UserNotFound)));
}

#[tokio::test]
async fn test_login_without_signing_secret_fails() {
    let repo = MemoryRepository::new();
    register(&repo, "alice@example.com", "secret123").await;

    let result = accounts::login(
        &repo,
        &hasher(),
        &TokenService::new(""),
        LoginRequest {
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        },
        now(),
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}
