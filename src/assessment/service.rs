//! The three orchestration operations.
//!
//! Each call performs at most one model exchange. There is no retry, no
//! caching and no deduplication across identical submissions.

use std::sync::Arc;
use std::time::Duration;

use super::gemini::GeminiClient;
use super::parser::{parse_chat_reply, parse_claim_prediction, parse_prediction};
use super::prompt::{build_chat_request, build_claim_prompt, build_liver_prompt};
use super::types::{ModelClient, Outcome};
use super::{AnalysisError, ModelError, Operation};
use crate::config::AppConfig;
use crate::models::{
    ChatMessage, ClaimPredictionResult, ClaimRecord, LiverPanelRecord, PredictionResult,
    RiskLevel,
};

pub const FALLBACK_CHAT_REPLY: &str = "API Key missing. Demo mode: I can't reach the reference \
model right now. Configure an API key to ask clinical reference questions.";

/// Placeholder liver assessment returned when no credential is configured.
pub fn fallback_prediction() -> PredictionResult {
    PredictionResult {
        risk_level: RiskLevel::Medium,
        probability: 45.0,
        analysis: "API Key missing. Mock analysis: Patient shows slightly elevated liver enzymes \
                   which may indicate early stage dysfunction."
            .into(),
        recommendations: vec![
            "Ensure API Key is set in environment".into(),
            "Review input data manually".into(),
        ],
    }
}

/// Placeholder claim screening returned when no credential is configured.
pub fn fallback_claim_prediction() -> ClaimPredictionResult {
    ClaimPredictionResult {
        is_fraud: false,
        risk_score: 50.0,
        reasoning: "API Key missing. Mock analysis: The claim could not be screened by the model; \
                    values appear within typical ranges but require manual review."
            .into(),
        flagged_fields: vec!["API key not configured".into()],
    }
}

/// How the service answers, decided once from configuration.
#[derive(Clone)]
pub enum ModelMode {
    /// A credential is configured: talk to the remote model.
    Live(Arc<dyn ModelClient>),
    /// No credential: fixed placeholder results after `delay`.
    Fallback { delay: Duration },
}

impl ModelMode {
    pub fn from_config(config: &AppConfig) -> Result<Self, ModelError> {
        match &config.api_key {
            Some(key) => {
                let client = GeminiClient::new(
                    &config.gemini_url,
                    &config.model,
                    key,
                    config.request_timeout,
                )?;
                Ok(ModelMode::Live(Arc::new(client)))
            }
            None => Ok(ModelMode::Fallback {
                delay: config.fallback_delay,
            }),
        }
    }
}

impl std::fmt::Debug for ModelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelMode::Live(_) => f.write_str("Live"),
            ModelMode::Fallback { delay } => f.debug_struct("Fallback").field("delay", delay).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssessmentService {
    mode: ModelMode,
}

impl AssessmentService {
    pub fn new(mode: ModelMode) -> Self {
        Self { mode }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ModelError> {
        let mode = ModelMode::from_config(config)?;
        match &mode {
            ModelMode::Live(_) => tracing::info!(model = %config.model, "Remote model configured"),
            ModelMode::Fallback { .. } => {
                tracing::warn!("No API key configured; assessments will return placeholder data")
            }
        }
        Ok(Self::new(mode))
    }

    pub fn is_live(&self) -> bool {
        matches!(self.mode, ModelMode::Live(_))
    }

    pub async fn assess_liver_risk(
        &self,
        record: &LiverPanelRecord,
    ) -> Result<Outcome<PredictionResult>, AnalysisError> {
        let client = match &self.mode {
            ModelMode::Live(client) => client,
            ModelMode::Fallback { delay } => {
                placeholder_delay(Operation::LiverRisk, *delay).await;
                return Ok(Outcome::Fallback(fallback_prediction()));
            }
        };

        let request = build_liver_prompt(record).into_generate_request();
        let result = client
            .generate(&request)
            .await
            .and_then(|reply| parse_prediction(&reply));
        finish(Operation::LiverRisk, result)
    }

    pub async fn assess_claim_fraud(
        &self,
        record: &ClaimRecord,
    ) -> Result<Outcome<ClaimPredictionResult>, AnalysisError> {
        let client = match &self.mode {
            ModelMode::Live(client) => client,
            ModelMode::Fallback { delay } => {
                placeholder_delay(Operation::ClaimFraud, *delay).await;
                return Ok(Outcome::Fallback(fallback_claim_prediction()));
            }
        };

        let request = build_claim_prompt(record).into_generate_request();
        let result = client
            .generate(&request)
            .await
            .and_then(|reply| parse_claim_prediction(&reply));
        finish(Operation::ClaimFraud, result)
    }

    /// Ask for the next assistant reply. `history` excludes `new_message`.
    pub async fn continue_chat(
        &self,
        history: &[ChatMessage],
        new_message: &str,
    ) -> Result<Outcome<String>, AnalysisError> {
        let client = match &self.mode {
            ModelMode::Live(client) => client,
            ModelMode::Fallback { delay } => {
                placeholder_delay(Operation::Chat, *delay).await;
                return Ok(Outcome::Fallback(FALLBACK_CHAT_REPLY.to_string()));
            }
        };

        let request = build_chat_request(history, new_message);
        let result = client
            .generate(&request)
            .await
            .and_then(|reply| parse_chat_reply(&reply));
        finish(Operation::Chat, result)
    }
}

async fn placeholder_delay(operation: Operation, delay: Duration) {
    tracing::warn!(operation = operation.as_str(), "No API key provided, returning mock data");
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn finish<T>(operation: Operation, result: Result<T, ModelError>) -> Result<Outcome<T>, AnalysisError> {
    match result {
        Ok(value) => {
            tracing::debug!(operation = operation.as_str(), "Model reply accepted");
            Ok(Outcome::Live(value))
        }
        Err(cause) => {
            tracing::error!(operation = operation.as_str(), error = %cause, "Model request failed");
            Err(AnalysisError::new(operation, cause))
        }
    }
}
