//! Assistant chat endpoints.
//!
//! - `GET /api/chat`: the full transcript, greeting first
//! - `POST /api/chat/send`: append a message and wait for the reply

use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, IdentityContext};
use crate::models::ChatMessage;

#[derive(Deserialize)]
pub struct ChatSendRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct ChatReplyResponse {
    pub reply: ChatMessage,
    pub messages: Vec<ChatMessage>,
}

/// `GET /api/chat`
pub async fn transcript(
    State(ctx): State<ApiContext>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    Ok(Json(TranscriptResponse {
        messages: ctx.core.chat_messages()?,
    }))
}

/// `POST /api/chat/send`
///
/// On failure the user's message stays in the transcript and no reply
/// is added.
pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(who): Extension<IdentityContext>,
    Json(req): Json<ChatSendRequest>,
) -> Result<Json<ChatReplyResponse>, ApiError> {
    tracing::debug!(email = %who.identity.email, chars = req.message.len(), "Chat message");

    let reply = ctx.core.send_chat(&req.message).await?;
    Ok(Json(ChatReplyResponse {
        reply,
        messages: ctx.core.chat_messages()?,
    }))
}
