//! Per-page form state: the record being edited plus the last outcome.
//!
//! Submissions are two-phase. `begin_submit` snapshots the record and hands
//! out a ticket; `finish_submit` applies the outcome only if the form has not
//! been reset or re-populated since. A second submission while one is pending
//! is allowed; disabling the submit control is the view's job.

use crate::assessment::{AnalysisError, Outcome};
use crate::models::{set_field, FieldError, Record};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("Please fill in: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),
}

/// Snapshot handed out by [`FormState::begin_submit`].
#[derive(Debug, Clone)]
pub struct SubmitTicket<R> {
    generation: u64,
    pub record: R,
}

#[derive(Debug, Clone)]
pub struct FormState<R, T> {
    record: R,
    result: Option<Outcome<T>>,
    error: Option<String>,
    in_flight: u32,
    generation: u64,
}

impl<R: Record, T> Default for FormState<R, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record, T> FormState<R, T> {
    pub fn new() -> Self {
        Self {
            record: R::default(),
            result: None,
            error: None,
            in_flight: 0,
            generation: 0,
        }
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn result(&self) -> Option<&Outcome<T>> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Fields still blank, in display order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.record.blank_fields()
    }

    /// Update one field. The previous result stays visible.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        set_field(&mut self.record, name, value)?;
        Ok(())
    }

    /// Back to the empty record; clears result and error.
    pub fn reset(&mut self) {
        self.replace_record(R::default());
    }

    /// Overwrite every field with a preset; clears result and error.
    pub fn apply_persona(&mut self, record: R) {
        self.replace_record(record);
    }

    fn replace_record(&mut self, record: R) {
        self.record = record;
        self.result = None;
        self.error = None;
        self.invalidate();
    }

    /// Drop any in-flight submission so its completion is ignored.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = 0;
    }

    /// Start a submission: refuse blank fields, clear the error, mark pending.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<R>, FormError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(FormError::MissingRequired(missing));
        }
        self.error = None;
        self.in_flight += 1;
        Ok(SubmitTicket {
            generation: self.generation,
            record: self.record.clone(),
        })
    }

    /// Apply a completed submission. Returns `false` when the ticket is stale
    /// and the outcome was discarded.
    ///
    /// A success replaces the result wholesale; a failure sets the error and
    /// leaves the previous result in place.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket<R>,
        outcome: Result<Outcome<T>, AnalysisError>,
    ) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{ModelError, Operation, ANALYSIS_FAILED_MESSAGE};
    use crate::models::{ClaimRecord, Gender, LiverPanelRecord, PredictionResult, RiskLevel};
    use crate::personas;

    type LiverForm = FormState<LiverPanelRecord, PredictionResult>;

    fn filled_liver_form() -> LiverForm {
        let mut form = LiverForm::new();
        form.apply_persona(personas::liver_persona("medium").unwrap().record);
        form
    }

    fn prediction(level: RiskLevel) -> PredictionResult {
        PredictionResult {
            risk_level: level,
            probability: 30.0,
            analysis: "ok".into(),
            recommendations: vec![],
        }
    }

    fn failure() -> AnalysisError {
        AnalysisError::new(Operation::LiverRisk, ModelError::EmptyReply)
    }

    #[test]
    fn new_form_is_empty_and_idle() {
        let form = LiverForm::new();
        assert_eq!(form.record(), &LiverPanelRecord::default());
        assert!(form.result().is_none());
        assert!(form.error().is_none());
        assert!(!form.is_pending());
    }

    #[test]
    fn set_field_updates_record() {
        let mut form = LiverForm::new();
        form.set_field("gender", "Female").unwrap();
        form.set_field("albumin", "3.4").unwrap();
        assert_eq!(form.record().gender, Gender::Female);
        assert_eq!(form.record().albumin, "3.4");
    }

    #[test]
    fn set_field_propagates_field_errors() {
        let mut form = LiverForm::new();
        let err = form.set_field("albumin", "n/a").unwrap_err();
        assert!(matches!(err, FormError::Field(FieldError::NotNumeric { .. })));
    }

    #[test]
    fn submit_refuses_blank_fields() {
        let mut form = LiverForm::new();
        form.set_field("age", "50").unwrap();
        let err = form.begin_submit().unwrap_err();
        match err {
            FormError::MissingRequired(fields) => {
                assert_eq!(fields.len(), 8);
                assert!(!fields.contains(&"age"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!form.is_pending());
    }

    #[test]
    fn successful_submit_replaces_result() {
        let mut form = filled_liver_form();
        let ticket = form.begin_submit().unwrap();
        assert!(form.is_pending());
        assert!(form.finish_submit(ticket, Ok(Outcome::Live(prediction(RiskLevel::Low)))));
        assert!(!form.is_pending());

        let ticket = form.begin_submit().unwrap();
        form.finish_submit(ticket, Ok(Outcome::Live(prediction(RiskLevel::High))));
        assert_eq!(form.result().unwrap().value().risk_level, RiskLevel::High);
    }

    #[test]
    fn failed_submit_sets_normalized_error_and_keeps_previous_result() {
        let mut form = filled_liver_form();
        let ticket = form.begin_submit().unwrap();
        form.finish_submit(ticket, Ok(Outcome::Live(prediction(RiskLevel::Low))));

        let ticket = form.begin_submit().unwrap();
        form.finish_submit(ticket, Err(failure()));
        assert_eq!(form.error(), Some(ANALYSIS_FAILED_MESSAGE));
        assert_eq!(form.result().unwrap().value().risk_level, RiskLevel::Low);

        // Next submission clears the error up front
        let _ticket = form.begin_submit().unwrap();
        assert!(form.error().is_none());
    }

    #[test]
    fn persona_overwrites_every_field_and_clears_result() {
        let mut form = LiverForm::new();
        for spec in <LiverPanelRecord as Record>::FIELDS {
            let value = if spec.name == "gender" { "Female" } else { "999" };
            form.set_field(spec.name, value).unwrap();
        }
        let ticket = form.begin_submit().unwrap();
        form.finish_submit(ticket, Ok(Outcome::Live(prediction(RiskLevel::High))));
        let ticket = form.begin_submit().unwrap();
        form.finish_submit(ticket, Err(failure()));
        assert!(form.result().is_some());
        assert!(form.error().is_some());

        let preset = personas::liver_persona("low").unwrap().record;
        form.apply_persona(preset.clone());
        assert_eq!(form.record(), &preset);
        assert!(form.result().is_none());
        assert!(form.error().is_none());

        // Idempotent regardless of prior contents
        form.apply_persona(preset.clone());
        assert_eq!(form.record(), &preset);
    }

    #[test]
    fn reset_restores_initial_record() {
        let mut form = FormState::<ClaimRecord, ()>::new();
        form.apply_persona(personas::claim_persona("high").unwrap().record);
        form.reset();
        assert_eq!(form.record(), &ClaimRecord::default());
    }

    #[test]
    fn completion_after_reset_is_discarded() {
        let mut form = filled_liver_form();
        let ticket = form.begin_submit().unwrap();
        form.reset();
        assert!(!form.is_pending());
        assert!(!form.finish_submit(ticket, Ok(Outcome::Live(prediction(RiskLevel::High)))));
        assert!(form.result().is_none());
    }

    #[test]
    fn concurrent_submissions_are_both_accepted() {
        let mut form = filled_liver_form();
        let first = form.begin_submit().unwrap();
        let second = form.begin_submit().unwrap();
        form.finish_submit(first, Ok(Outcome::Live(prediction(RiskLevel::Low))));
        assert!(form.is_pending());
        form.finish_submit(second, Ok(Outcome::Live(prediction(RiskLevel::Medium))));
        assert!(!form.is_pending());
        assert_eq!(form.result().unwrap().value().risk_level, RiskLevel::Medium);
    }
}
