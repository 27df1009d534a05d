use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core services: credentials, sessions, ownership and persistence.
pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod ownership;
pub mod password;
pub mod repository;
pub mod token;

// HTTP surface.
pub mod handlers;
pub mod models;
pub mod routes;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use password::PasswordHasher;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};
pub use token::TokenService;

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the OpenAPI
/// document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_user, handlers::login_user, handlers::list_users,
        handlers::get_user, handlers::update_user, handlers::delete_user,
        handlers::list_photos, handlers::list_photos_by_user, handlers::get_photo,
        handlers::create_photo, handlers::update_photo, handlers::delete_photo,
        handlers::list_comments, handlers::get_comment, handlers::create_comment,
        handlers::update_comment, handlers::delete_comment,
        handlers::list_social_medias, handlers::get_social_media,
        handlers::create_social_media, handlers::update_social_media,
        handlers::delete_social_media
    ),
    components(
        schemas(
            models::UserView, models::SignUpRequest, models::LoginRequest,
            models::TokenResponse, models::UpdateUserRequest,
            models::Photo, models::CreatePhotoRequest, models::UpdatePhotoRequest,
            models::Comment, models::CreateCommentRequest, models::UpdateCommentRequest,
            models::SocialMedia, models::CreateSocialMediaRequest,
            models::UpdateSocialMediaRequest,
        )
    ),
    tags(
        (name = "photogram", description = "Photo sharing API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single immutable container shared by every request. Each component is cheap to
/// clone and can be pulled out on its own through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Session token issuer/verifier, keyed with the configured secret.
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
    pub config: AppConfig,
}

impl AppState {
    /// new
    ///
    /// Wires the token service and password hasher from the loaded configuration.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self {
            repo,
            tokens: TokenService::new(&config.jwt_secret),
            hasher: PasswordHasher::new(config.bcrypt_cost),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for PasswordHasher {
    fn from_ref(app_state: &AppState) -> PasswordHasher {
        app_state.hasher
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing tree, applies the bearer-token layer to the authenticated
/// routes, and wraps everything in the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // route_layer: unmatched paths still 404 instead of 401.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_bearer,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span with the method, URI and `x-request-id`, so every log
/// line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
