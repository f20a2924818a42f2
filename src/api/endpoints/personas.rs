//! Persona selector entries.

use axum::Json;
use serde::Serialize;

use crate::personas::{list_claim_personas, list_liver_personas, PersonaSummary};

#[derive(Serialize)]
pub struct PersonaListResponse {
    pub liver: Vec<PersonaSummary>,
    pub claims: Vec<PersonaSummary>,
}

/// `GET /api/personas`
pub async fn list() -> Json<PersonaListResponse> {
    Json(PersonaListResponse {
        liver: list_liver_personas(),
        claims: list_claim_personas(),
    })
}
