pub mod api;
pub mod assessment;
pub mod auth;
pub mod chat;
pub mod config;
pub mod core_state;
pub mod forms;
pub mod models;
pub mod personas;
pub mod render;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Start the server and run until Ctrl-C.
pub async fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = config::AppConfig::from_env().map_err(|e| e.to_string())?;
    let bind_addr = app_config.bind_addr;
    let core = core_state::CoreState::from_config(app_config).map_err(|e| e.to_string())?;

    let mut server = api::start_server_on(Arc::new(core), bind_addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for Ctrl-C: {e}");
    }
    server.shutdown();
    Ok(())
}
