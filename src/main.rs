// src/main.rs

use std::sync::Arc;

use enrollment::config::Config;
use enrollment::quiz::{default_bank, validate_bank};
use enrollment::routes;
use enrollment::state::AppState;
use enrollment::store::RecordStore;
use enrollment::utils::hash::AdminCredentials;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (and .env, if present)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let store = RecordStore::open(&config.students_file).await?;
    tracing::info!(
        "Student records at {:?} ({} stored)",
        store.path(),
        store.list().await.len()
    );

    let bank = default_bank();
    validate_bank(&bank)?;
    tracing::info!("Question bank loaded with {} questions", bank.len());

    let admin = AdminCredentials::from_config(&config)?.map(Arc::new);
    if admin.is_none() {
        tracing::warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set, dashboard login is disabled");
    }

    // Create AppState
    let state = AppState {
        store,
        config: config.clone(),
        bank: Arc::new(bank),
        admin,
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    // Start the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
