use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that work without a bearer token. Everything else in the API requires one.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Never touches the database.
        .route("/health", get(|| async { "ok" }))
        // POST /users/register
        // Creates a credential after the age, password and email checks.
        .route("/users/register", post(handlers::register_user))
        // POST /users/login
        // Exchanges email and password for a one hour session token.
        .route("/users/login", post(handlers::login_user))
}
