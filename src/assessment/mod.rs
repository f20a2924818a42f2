//! Request/response orchestration with the remote generative model.
//!
//! Prompt builders turn a record into an instruction and a declared output
//! schema, the model client performs exactly one exchange per operation, and
//! the parser accepts only replies matching the schema. Without a configured
//! credential the service answers with fixed placeholder results instead.

pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod schema;
pub mod service;
pub mod types;

pub use gemini::*;
pub use parser::*;
pub use prompt::*;
pub use schema::*;
pub use service::*;
pub use types::*;

use thiserror::Error;

/// User-facing text for every failed analysis.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze data. Please try again.";

/// Detailed failure of a single model exchange. Logged, never shown to users.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model endpoint unreachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Empty response from model")]
    EmptyReply,

    #[error("Malformed JSON in model reply: {0}")]
    MalformedJson(String),

    #[error("Reply does not match the declared schema: {0}")]
    SchemaMismatch(String),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Which orchestration operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LiverRisk,
    ClaimFraud,
    Chat,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LiverRisk => "liver_risk",
            Operation::ClaimFraud => "claim_fraud",
            Operation::Chat => "chat",
        }
    }
}

/// Normalized failure surfaced to callers. The message is the same for
/// every cause; the cause is kept for logging.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to analyze data. Please try again.")]
pub struct AnalysisError {
    pub operation: Operation,
    #[source]
    pub cause: ModelError,
}

impl AnalysisError {
    pub fn new(operation: Operation, cause: ModelError) -> Self {
        Self { operation, cause }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cause_renders_the_same_message() {
        let causes = [
            ModelError::EmptyReply,
            ModelError::MalformedJson("eof".into()),
            ModelError::Connection("http://x".into()),
            ModelError::Status {
                status: 500,
                body: "boom".into(),
            },
        ];
        for cause in causes {
            let err = AnalysisError::new(Operation::LiverRisk, cause);
            assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);
        }
    }

    #[test]
    fn cause_is_exposed_as_source() {
        use std::error::Error as _;
        let err = AnalysisError::new(Operation::Chat, ModelError::EmptyReply);
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Empty response from model");
    }
}
