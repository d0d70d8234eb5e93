use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use folio_db::{Database, DbAvailability, DbPool};
use folio_media::{CloudinaryConfig, CloudinaryStore, ImageStore, UnconfiguredStore};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "folio_api=debug,folio_db=debug,folio_media=debug,tower_http=debug".into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let connection = folio_db::connect_with_retry(
        &config.database.url,
        &config.database.retry_policy(),
    )
    .await
    .expect("DATABASE_URL is not a valid connection string");

    if connection.availability.is_available() {
        folio_db::run_migrations(&connection.pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");
    } else {
        defer_migrations(connection.pool.clone(), &connection.availability);
    }

    let monitor_cancel = CancellationToken::new();
    let monitor_handle = folio_db::monitor::spawn_monitor(
        connection.pool.clone(),
        connection.availability.clone(),
        config.database.monitor_interval(),
        monitor_cancel.clone(),
    );

    let db = Database::new(
        connection.pool.clone(),
        connection.availability,
        config.database.query_timeout(),
    );

    // --- Image host ---
    let images: Arc<dyn ImageStore> = match CloudinaryConfig::from_env() {
        Some(cloudinary) => {
            tracing::info!(cloud_name = %cloudinary.cloud_name, "Cloudinary image store configured");
            Arc::new(CloudinaryStore::new(cloudinary))
        }
        None => {
            tracing::warn!("Cloudinary credentials missing, image uploads will be skipped");
            Arc::new(UnconfiguredStore)
        }
    };

    // --- App state & router ---
    let state = AppState {
        db,
        images,
        config: Arc::new(config.clone()),
        started_at: Instant::now(),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST:PORT combination");

    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    monitor_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), monitor_handle).await;
    tracing::info!("Database monitor stopped");

    connection.pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Apply migrations the first time the monitor sees the database come up.
fn defer_migrations(pool: DbPool, availability: &DbAvailability) {
    let mut available = availability.subscribe();
    tokio::spawn(async move {
        if available.wait_for(|up| *up).await.is_err() {
            return;
        }
        match folio_db::run_migrations(&pool).await {
            Ok(()) => tracing::info!("Deferred database migrations applied"),
            Err(e) => tracing::error!(error = %e, "Deferred database migrations failed"),
        }
    });
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
