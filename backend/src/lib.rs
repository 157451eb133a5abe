//! # Certificate Backend
//!
//! Issues, lists, edits and revokes academy certificates for the public
//! verification page.
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients (verification page, scripts)
//!     ↓
//! IO Layer (axum REST handlers, DTO mapping)
//!     ↓
//! Domain Layer (certificate rules, CertificateService facade)
//!     ↓
//! Storage Layer (SQLite when connected, JSON file otherwise)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod keep_alive;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, Environment};
use crate::domain::CertificateService;
use crate::io::rest::{certificate_apis, health_apis};
use crate::storage::{DbConnection, JsonConnection};

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub certificate_service: CertificateService,
    pub environment: Environment,
}

/// Everything `initialize_backend` wires up
pub struct Backend {
    pub app_state: AppState,
    pub db_connection: DbConnection,
    pub json_connection: JsonConnection,
}

/// Open storage and build the application state.
///
/// The database connect is best-effort; without it the service starts in
/// fallback mode on the JSON file.
pub async fn initialize_backend(config: &Config) -> Result<Backend> {
    info!(path = %config.data_dir.display(), "Setting up file storage");
    let json_connection = JsonConnection::new(&config.data_dir, config.environment.is_production())?;

    info!("Setting up database");
    let db_connection = DbConnection::connect_or_disconnected(
        config.database_url.as_deref(),
        config.database_connect_timeout,
    )
    .await;
    db_connection.spawn_health_monitor(config.database_health_interval);

    info!("Setting up certificate service");
    let certificate_service =
        CertificateService::from_connections(db_connection.clone(), json_connection.clone());
    certificate_service.prime_identifiers().await;

    Ok(Backend {
        app_state: AppState {
            certificate_service,
            environment: config.environment,
        },
        db_connection,
        json_connection,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // Any origin may call the API, cookies included
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/health", get(health_apis::health))
        .nest("/certificates", certificate_apis::router());

    let mut router = Router::new()
        .route("/", get(health_apis::api_info))
        .nest("/api", api_routes)
        .fallback(health_apis::not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors);

    if !app_state.environment.is_production() {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(app_state)
}
