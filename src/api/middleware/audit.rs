//! Access logging middleware.
//!
//! Logs every request with method, path, response status and the
//! identity known once the handler has run.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::ApiContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let ctx = req.extensions().get::<ApiContext>().cloned();
    let started = Instant::now();

    let response = next.run(req).await;

    let identity = ctx
        .and_then(|ctx| ctx.core.current_identity().ok().flatten())
        .map(|identity| identity.email)
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        %identity,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    response
}
