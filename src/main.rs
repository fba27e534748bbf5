use dotenvy::dotenv;
use retail_ops::{
    api::{self, AppState},
    config::{self, database},
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;
    info!(
        bind_addr = %app_config.server.bind_addr(),
        "Loaded application configuration"
    );

    // 4. Initialize database
    let db = database::init_db(&app_config.database.url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Serve HTTP until Ctrl-C
    let app = api::router(AppState {
        database: Arc::new(db),
    });
    let listener = tokio::net::TcpListener::bind(app_config.server.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
