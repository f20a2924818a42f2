//! Application router.
//!
//! Pages live at the root, the JSON API under `/api/`. Anything else
//! redirects home, except unknown `/api` paths, which answer 404 JSON.
//!
//! Middleware stack (outermost → innermost):
//! 1. Extension(ApiContext) → 2. CORS → 3. Access log → 4. Identity guard

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the full application router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn app_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn no_store() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected_api = Router::new()
        .route("/liver", get(endpoints::liver::show))
        .route("/liver/fields", put(endpoints::liver::set_field))
        .route("/liver/reset", post(endpoints::liver::reset))
        .route("/liver/persona/:key", post(endpoints::liver::persona))
        .route("/liver/submit", post(endpoints::liver::submit))
        .route("/claims", get(endpoints::claims::show))
        .route("/claims/fields", put(endpoints::claims::set_field))
        .route("/claims/reset", post(endpoints::claims::reset))
        .route("/claims/persona/:key", post(endpoints::claims::persona))
        .route("/claims/submit", post(endpoints::claims::submit))
        .route("/personas", get(endpoints::personas::list))
        .route("/chat", get(endpoints::chat::transcript))
        .route("/chat/send", post(endpoints::chat::send))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_identity))
        .layer(no_store());

    let public_api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/login", post(endpoints::auth::login))
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/auth/session", get(endpoints::auth::session))
        .with_state(ctx.clone());

    let api = public_api
        .merge(protected_api)
        .fallback(endpoints::not_found);

    let protected_pages = Router::new()
        .route("/prediction", get(endpoints::pages::prediction))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_page_identity))
        .layer(no_store());

    let public_pages = Router::new()
        .route("/", get(endpoints::pages::home))
        .route("/login", get(endpoints::pages::login))
        .with_state(ctx.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    Router::new()
        .merge(public_pages)
        .merge(protected_pages)
        .nest("/api", api)
        .fallback(endpoints::pages::redirect_home)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors)
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx))
}
