//! Liver panel form endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, FormView};
use crate::core_state::Workspace;
use crate::models::{LiverPanelRecord, PredictionResult};
use crate::personas::liver_persona;
use crate::render::present_prediction;

use super::FieldUpdate;

pub type LiverFormView = FormView<LiverPanelRecord, PredictionResult>;

fn view(ws: &mut Workspace) -> LiverFormView {
    FormView::of(&ws.liver, present_prediction)
}

/// `GET /api/liver`
pub async fn show(State(ctx): State<ApiContext>) -> Result<Json<LiverFormView>, ApiError> {
    Ok(Json(ctx.core.with_workspace(view)?))
}

/// `PUT /api/liver/fields`
pub async fn set_field(
    State(ctx): State<ApiContext>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<LiverFormView>, ApiError> {
    let updated = ctx
        .core
        .with_workspace(|ws| ws.liver.set_field(&req.name, &req.value).map(|()| view(ws)))?;
    Ok(Json(updated?))
}

/// `POST /api/liver/reset`
pub async fn reset(State(ctx): State<ApiContext>) -> Result<Json<LiverFormView>, ApiError> {
    let updated = ctx.core.with_workspace(|ws| {
        ws.liver.reset();
        view(ws)
    })?;
    Ok(Json(updated))
}

/// `POST /api/liver/persona/:key`
pub async fn persona(
    State(ctx): State<ApiContext>,
    Path(key): Path<String>,
) -> Result<Json<LiverFormView>, ApiError> {
    let persona =
        liver_persona(&key).ok_or_else(|| ApiError::NotFound(format!("Unknown persona: {key}")))?;
    let updated = ctx.core.with_workspace(|ws| {
        ws.liver.apply_persona(persona.record);
        view(ws)
    })?;
    Ok(Json(updated))
}

/// `POST /api/liver/submit`
pub async fn submit(State(ctx): State<ApiContext>) -> Result<Json<LiverFormView>, ApiError> {
    ctx.core.submit_liver().await?;
    Ok(Json(ctx.core.with_workspace(view)?))
}
