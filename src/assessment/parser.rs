use serde::de::DeserializeOwned;

use super::prompt::{claim_schema, liver_schema};
use super::schema::ResponseSchema;
use super::ModelError;
use crate::models::{ClaimPredictionResult, PredictionResult};

/// Parse a structured reply into `T`, accepting it only when it matches
/// `schema` exactly.
pub fn parse_structured_reply<T: DeserializeOwned>(
    reply: &str,
    schema: &ResponseSchema,
) -> Result<T, ModelError> {
    let json_str = strip_code_fence(reply.trim());
    if json_str.is_empty() {
        return Err(ModelError::EmptyReply);
    }

    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| ModelError::MalformedJson(e.to_string()))?;

    let validator = jsonschema::validator_for(&schema.to_json_schema())
        .map_err(|e| ModelError::SchemaMismatch(format!("invalid schema: {e}")))?;
    let violations: Vec<String> = validator
        .iter_errors(&value)
        .map(|e| format!("{} {e}", e.instance_path))
        .collect();
    if !violations.is_empty() {
        return Err(ModelError::SchemaMismatch(violations.join("; ")));
    }

    serde_json::from_value(value).map_err(|e| ModelError::SchemaMismatch(e.to_string()))
}

pub fn parse_prediction(reply: &str) -> Result<PredictionResult, ModelError> {
    let result: PredictionResult = parse_structured_reply(reply, &liver_schema())?;
    check_percentage("probability", result.probability)?;
    Ok(result)
}

pub fn parse_claim_prediction(reply: &str) -> Result<ClaimPredictionResult, ModelError> {
    let result: ClaimPredictionResult = parse_structured_reply(reply, &claim_schema())?;
    check_percentage("riskScore", result.risk_score)?;
    Ok(result)
}

/// Plain-text chat reply; only emptiness is an error.
pub fn parse_chat_reply(reply: &str) -> Result<String, ModelError> {
    let text = reply.trim();
    if text.is_empty() {
        return Err(ModelError::EmptyReply);
    }
    Ok(text.to_string())
}

fn check_percentage(field: &'static str, value: f64) -> Result<(), ModelError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::OutOfRange { field, value })
    }
}

/// Unwrap a ```json fenced block if the model added one anyway.
fn strip_code_fence(reply: &str) -> &str {
    let Some(rest) = reply.strip_prefix("```") else {
        return reply;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
