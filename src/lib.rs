pub mod adapters;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod openapi;
pub mod ports;
pub mod schemas;
pub mod services;
pub mod utils;
pub mod validation;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenService;
use crate::config::Config;
use crate::health::HealthMonitor;
use crate::middleware::request_logger::{request_logger_middleware, RequestLogConfig};
use crate::openapi::ApiDoc;
use crate::ports::{ProjectRepository, UserRepository};
use crate::services::uploads::UPLOADS_ROUTE;
use crate::services::{AccountService, ProjectService, UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub accounts: AccountService,
    pub projects: ProjectService,
    pub uploads: UploadStore,
    pub health: Arc<HealthMonitor>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        health: HealthMonitor,
    ) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            chrono::Duration::hours(config.jwt_expiry_hours),
        );
        let accounts = AccountService::new(users, tokens.clone(), config.bcrypt_cost);

        Self {
            tokens,
            accounts,
            projects: ProjectService::new(projects),
            uploads: UploadStore::new(config.upload_dir.clone()),
            health: Arc::new(health),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let uploads = Router::new()
        .route("/", post(handlers::uploads::upload_file))
        .fallback_service(ServeDir::new(state.uploads.dir()));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/user/me",
            get(handlers::users::me).put(handlers::users::update_me),
        )
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/register", post(handlers::admin::create_user))
        .route(
            "/admin/users/:id",
            put(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
        .route("/admin/users/:id/toggle", patch(handlers::admin::toggle_user))
        .nest(UPLOADS_ROUTE, uploads)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(
            RequestLogConfig {
                log_body: config.log_request_body,
            },
            request_logger_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
