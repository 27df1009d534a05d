//! Application error taxonomy and its HTTP mapping.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{password::HashingError, repository::StoreError, token::TokenError};

/// AppError
///
/// Every failure a handler can return. Each variant is scoped to the single request
/// that produced it; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Validation (400) ---
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid date of birth format")]
    InvalidDate,
    #[error("age must be at least {min} years old")]
    AgeRestriction { min: i32 },
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("invalid email format")]
    InvalidEmail,
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),
    // Missing fields, bad JSON or a wrong content type on a `Json` body.
    #[error("{}", .0.body_text())]
    InvalidJson(#[from] JsonRejection),

    // --- Authentication (401) ---
    #[error("{0}")]
    Unauthorized(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),

    // --- Authorization (403) ---
    #[error("{0}")]
    Forbidden(String),

    // --- Not found (404) ---
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("user not found")]
    UserNotFound,

    // --- Conflict (409) ---
    #[error("email already exist")]
    EmailTaken,

    // --- Infrastructure (500) ---
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::InvalidDate
            | AppError::AgeRestriction { .. }
            | AppError::WeakPassword { .. }
            | AppError::InvalidEmail
            | AppError::Validation(_)
            | AppError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            AppError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) | AppError::InvalidCredentials | AppError::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::Hashing(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // Internals stay in the logs; the caller gets a generic message.
            tracing::error!(error = %self, "request failed with an infrastructure error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
