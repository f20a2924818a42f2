//! Endpoint handlers.
//!
//! Each module corresponds to one page or feature. Handlers are thin:
//! they lock, delegate to `CoreState`, and shape the response.

pub mod auth;
pub mod chat;
pub mod claims;
pub mod health;
pub mod liver;
pub mod pages;
pub mod personas;

use serde::Deserialize;

use crate::api::error::ApiError;

/// Body of `PUT /api/{liver,claims}/fields`.
#[derive(Deserialize)]
pub struct FieldUpdate {
    pub name: String,
    pub value: String,
}

/// Unmatched path under `/api`.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".into())
}
