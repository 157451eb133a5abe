use std::net::SocketAddr;

use certificate_backend::config::Config;
use certificate_backend::keep_alive::spawn_keep_alive;
use certificate_backend::storage::JsonCertificateRepository;
use certificate_backend::{create_router, initialize_backend};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let config = Config::from_env()?;

    let default_filter = if config.environment.is_production() {
        "info"
    } else {
        "info,certificate_backend=debug,tower_http=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let backend = initialize_backend(&config).await?;

    match config.keep_alive.clone() {
        Some(keep_alive) => {
            spawn_keep_alive(keep_alive)?;
        }
        None if config.environment.is_production() => {
            warn!("No keep-alive URL configured. Set RENDER_EXTERNAL_URL or KEEP_ALIVE_URL.");
        }
        None => {}
    }

    let certificates_file = backend.json_connection.certificates_file_path();
    let file_count = JsonCertificateRepository::new(backend.json_connection.clone())
        .read_certificates()
        .await
        .len();
    let database_connected = backend.db_connection.is_connected();

    let app = create_router(backend.app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        %addr,
        environment = %config.environment,
        certificates_file = %certificates_file.display(),
        database_connected,
        "Backend server started"
    );
    info!("API: http://localhost:{}/api", config.port);
    info!("Health: http://localhost:{}/api/health", config.port);
    info!("{} certificates loaded from file storage", file_count);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
