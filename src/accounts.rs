//! Sign-up and login flows.
//!
//! Both flows take the current time as an argument so that age limits and token
//! windows can be exercised deterministically.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use validator::ValidateEmail;

use crate::{
    error::AppError,
    models::{LoginRequest, NewUser, SignUpRequest, UserView},
    password::PasswordHasher,
    repository::{Repository, StoreError},
    token::TokenService,
};

/// Youngest age, in whole years, allowed to register.
pub const MIN_AGE: i32 = 8;
/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Wire format of the date-of-birth field.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// age_on
///
/// Whole years between `dob` and `today`: the year difference, minus one if the
/// birthday has not come round yet this year.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// sign_up
///
/// Validates the payload, hashes the password, and persists a new credential.
///
/// Check order is fixed: date of birth, age, password length, email syntax. The email
/// lookup before insert is only a fast path; the store's unique index decides races.
pub async fn sign_up(
    repo: &dyn Repository,
    hasher: &PasswordHasher,
    req: SignUpRequest,
    now: DateTime<Utc>,
) -> Result<UserView, AppError> {
    let dob =
        NaiveDate::parse_from_str(req.dob.trim(), DOB_FORMAT).map_err(|_| AppError::InvalidDate)?;

    if age_on(dob, now.date_naive()) < MIN_AGE {
        return Err(AppError::AgeRestriction { min: MIN_AGE });
    }

    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }

    if !req.email.validate_email() {
        return Err(AppError::InvalidEmail);
    }

    if req.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }

    let password_hash = hasher.hash(&req.password)?;

    if repo.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }

    let created = repo
        .insert_user(NewUser {
            username: req.username,
            email: req.email,
            password_hash,
            dob,
        })
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => AppError::EmailTaken,
            other => AppError::Store(other),
        })?;

    tracing::info!(user_id = created.id, "registered new user");
    Ok(UserView::from(created))
}

/// login
///
/// Verifies credentials and issues a session token.
pub async fn login(
    repo: &dyn Repository,
    hasher: &PasswordHasher,
    tokens: &TokenService,
    req: LoginRequest,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    let user = repo
        .find_user_by_email(&req.email)
        .await?
        .filter(|user| user.id != 0)
        .ok_or(AppError::UserNotFound)?;

    if !hasher.verify(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "login rejected: password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens.issue(user.id, &user.username, user.dob, now)?;
    tracing::info!(user_id = user.id, "issued session token");
    Ok(token)
}
