//! Server lifecycle: bind, spawn, shut down.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::api::router::app_router;
use crate::core_state::CoreState;

/// Metadata for a running server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSession {
    pub server_addr: String,
}

/// Handle to a running server.
pub struct ApiServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }
}

/// Bind `addr` (port 0 picks an ephemeral port) and serve the app router
/// in a background task.
pub async fn start_server_on(core: Arc<CoreState>, addr: SocketAddr) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = app_router(core);

    let session = ServerSession {
        server_addr: addr.to_string(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::AssessmentService;
    use crate::auth::MemoryStorage;
    use crate::config::AppConfig;

    fn test_core() -> Arc<CoreState> {
        let config = AppConfig::for_tests(std::env::temp_dir());
        let service = AssessmentService::from_config(&config).unwrap();
        Arc::new(CoreState::new(config, Arc::new(MemoryStorage::default()), service))
    }

    fn localhost() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_server_on(test_core(), localhost())
            .await
            .expect("server should start");
        let url = format!("http://{}/api/health", server.session.server_addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn ephemeral_port_is_resolved() {
        let mut server = start_server_on(test_core(), localhost())
            .await
            .expect("server should start");

        let addr: SocketAddr = server.session.server_addr.parse().unwrap();
        assert_ne!(addr.port(), 0);

        server.shutdown();
    }

    #[tokio::test]
    async fn login_persists_across_requests() {
        let mut server = start_server_on(test_core(), localhost())
            .await
            .expect("server should start");
        let base = format!("http://{}", server.session.server_addr);
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/api/auth/login"))
            .json(&serde_json::json!({"email": "doc@hospital.com", "password": "secret1"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let resp = client.get(format!("{base}/api/liver")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server_on(test_core(), localhost())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown();
    }
}
