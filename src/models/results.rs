use serde::{Deserialize, Serialize};

use super::enums::RiskLevel;

/// Liver disease risk assessment returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub risk_level: RiskLevel,
    /// 0–100.
    pub probability: f64,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

/// Claim fraud screening returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPredictionResult {
    pub is_fraud: bool,
    /// 0–100.
    pub risk_score: f64,
    pub reasoning: String,
    pub flagged_fields: Vec<String>,
}
