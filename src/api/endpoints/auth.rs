//! Login, logout and session endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Identity;

/// Where the client goes after a successful login.
pub const POST_LOGIN_PATH: &str = "/prediction";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub identity: Identity,
    pub redirect: &'static str,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub identity: Option<Identity>,
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let identity = ctx.core.login(&req.email, &req.password).await?;
    Ok(Json(LoginResponse {
        identity,
        redirect: POST_LOGIN_PATH,
    }))
}

/// `POST /api/auth/logout`
pub async fn logout(State(ctx): State<ApiContext>) -> Result<StatusCode, ApiError> {
    ctx.core.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/session`
pub async fn session(State(ctx): State<ApiContext>) -> Result<Json<SessionResponse>, ApiError> {
    let identity = ctx.core.current_identity()?;
    Ok(Json(SessionResponse {
        authenticated: identity.is_some(),
        identity,
    }))
}
