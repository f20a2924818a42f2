//! Identity guard for protected routes.
//!
//! Reads the current identity from `CoreState` and injects an
//! `IdentityContext` into request extensions for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, IdentityContext};

/// Protected API routes: 401 without an identity.
pub async fn require_identity(req: Request<axum::body::Body>, next: Next) -> Response {
    match attach_identity(req) {
        Ok(req) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

/// Protected pages: redirect to the login page, remembering where the
/// visitor was going.
pub async fn require_page_identity(req: Request<axum::body::Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    match attach_identity(req) {
        Ok(req) => next.run(req).await,
        Err(ApiError::Unauthorized) => Redirect::to(&login_redirect(&path)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn login_redirect(from: &str) -> String {
    format!("/login?from={from}")
}

fn attach_identity(
    mut req: Request<axum::body::Body>,
) -> Result<Request<axum::body::Body>, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let identity = ctx.core.require_identity()?;
    req.extensions_mut().insert(IdentityContext { identity });
    Ok(req)
}
