//! Result presentation: a classified result → a color-coded view model.
//!
//! The tier is taken from the classification already present in the
//! result; nothing is thresholded here.

use serde::Serialize;

use crate::assessment::Outcome;
use crate::models::{ClaimPredictionResult, PredictionResult, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Red,
    Yellow,
    Green,
}

impl Tier {
    pub fn for_risk(level: RiskLevel) -> Self {
        match level {
            RiskLevel::High => Tier::Red,
            RiskLevel::Medium => Tier::Yellow,
            RiskLevel::Low => Tier::Green,
        }
    }

    pub fn for_fraud(is_fraud: bool) -> Self {
        if is_fraud {
            Tier::Red
        } else {
            Tier::Green
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub tier: Tier,
    pub label: String,
    pub score_label: &'static str,
    pub score: f64,
    pub rationale: String,
    pub items_heading: &'static str,
    pub items: Vec<String>,
    /// Set when the result is the placeholder returned without a credential.
    pub placeholder: bool,
}

pub fn present_prediction(result: &PredictionResult) -> ResultView {
    ResultView {
        tier: Tier::for_risk(result.risk_level),
        label: result.risk_level.as_str().to_uppercase(),
        score_label: "Probability",
        score: result.probability,
        rationale: result.analysis.clone(),
        items_heading: "Recommendations",
        items: result.recommendations.clone(),
        placeholder: false,
    }
}

pub fn present_claim_prediction(result: &ClaimPredictionResult) -> ResultView {
    ResultView {
        tier: Tier::for_fraud(result.is_fraud),
        label: if result.is_fraud {
            "FRAUD LIKELY".into()
        } else {
            "LEGITIMATE".into()
        },
        score_label: "Risk Score",
        score: result.risk_score,
        rationale: result.reasoning.clone(),
        items_heading: "Flagged Fields",
        items: result.flagged_fields.clone(),
        placeholder: false,
    }
}

/// Present a sourced result, marking placeholders.
pub fn present_outcome<T>(outcome: &Outcome<T>, present: fn(&T) -> ResultView) -> ResultView {
    ResultView {
        placeholder: outcome.is_fallback(),
        ..present(outcome.value())
    }
}
