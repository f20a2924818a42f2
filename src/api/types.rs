//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::Serialize;

use crate::assessment::Outcome;
use crate::core_state::CoreState;
use crate::forms::FormState;
use crate::models::{Identity, Record};
use crate::render::{present_outcome, ResultView};

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Logged-in physician, injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    pub identity: Identity,
}

/// Snapshot of one form as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView<R, T> {
    pub record: R,
    pub missing: Vec<&'static str>,
    pub pending: bool,
    pub error: Option<String>,
    pub outcome: Option<Outcome<T>>,
    pub view: Option<ResultView>,
}

impl<R: Record, T: Clone> FormView<R, T> {
    pub fn of(form: &FormState<R, T>, present: fn(&T) -> ResultView) -> Self {
        Self {
            record: form.record().clone(),
            missing: form.missing_required(),
            pending: form.is_pending(),
            error: form.error().map(str::to_string),
            outcome: form.result().cloned(),
            view: form.result().map(|outcome| present_outcome(outcome, present)),
        }
    }
}
