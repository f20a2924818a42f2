use futures_util::future::BoxFuture;
use serde::Serialize;

use super::schema::ResponseSchema;
use super::ModelError;
use crate::models::ChatRole;

/// One role-tagged turn of the conversation sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: ChatRole,
    pub text: String,
}

/// A single logical request to the remote model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    pub turns: Vec<Turn>,
    /// When set, the reply must be a JSON document matching this schema.
    pub response_schema: Option<ResponseSchema>,
}

/// Remote model abstraction (allows mocking).
///
/// Returns the raw reply text. An empty string means the model produced no
/// content; interpreting it is left to the caller.
pub trait ModelClient: Send + Sync {
    fn generate<'a>(&'a self, request: &'a GenerateRequest) -> BoxFuture<'a, Result<String, ModelError>>;
}

/// Where a result came from: the placeholder path or the remote model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "result", rename_all = "lowercase")]
pub enum Outcome<T> {
    Fallback(T),
    Live(T),
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Fallback(v) | Outcome::Live(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Outcome::Fallback(v) | Outcome::Live(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Fallback(v) => Outcome::Fallback(f(v)),
            Outcome::Live(v) => Outcome::Live(f(v)),
        }
    }
}
