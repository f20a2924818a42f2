//! Insurance claim form endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, FormView};
use crate::core_state::Workspace;
use crate::models::{ClaimPredictionResult, ClaimRecord};
use crate::personas::claim_persona;
use crate::render::present_claim_prediction;

use super::FieldUpdate;

pub type ClaimFormView = FormView<ClaimRecord, ClaimPredictionResult>;

fn view(ws: &mut Workspace) -> ClaimFormView {
    FormView::of(&ws.claim, present_claim_prediction)
}

/// `GET /api/claims`
pub async fn show(State(ctx): State<ApiContext>) -> Result<Json<ClaimFormView>, ApiError> {
    Ok(Json(ctx.core.with_workspace(view)?))
}

/// `PUT /api/claims/fields`
pub async fn set_field(
    State(ctx): State<ApiContext>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<ClaimFormView>, ApiError> {
    let updated = ctx
        .core
        .with_workspace(|ws| ws.claim.set_field(&req.name, &req.value).map(|()| view(ws)))?;
    Ok(Json(updated?))
}

/// `POST /api/claims/reset`
pub async fn reset(State(ctx): State<ApiContext>) -> Result<Json<ClaimFormView>, ApiError> {
    let updated = ctx.core.with_workspace(|ws| {
        ws.claim.reset();
        view(ws)
    })?;
    Ok(Json(updated))
}

/// `POST /api/claims/persona/:key`
pub async fn persona(
    State(ctx): State<ApiContext>,
    Path(key): Path<String>,
) -> Result<Json<ClaimFormView>, ApiError> {
    let persona =
        claim_persona(&key).ok_or_else(|| ApiError::NotFound(format!("Unknown persona: {key}")))?;
    let updated = ctx.core.with_workspace(|ws| {
        ws.claim.apply_persona(persona.record);
        view(ws)
    })?;
    Ok(Json(updated))
}

/// `POST /api/claims/submit`
pub async fn submit(State(ctx): State<ApiContext>) -> Result<Json<ClaimFormView>, ApiError> {
    ctx.core.submit_claim().await?;
    Ok(Json(ctx.core.with_workspace(view)?))
}
