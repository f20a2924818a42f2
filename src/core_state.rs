//! Application state shared by every request handler.
//!
//! `CoreState` is built once at startup and handed to the router behind an
//! `Arc`. Each piece of mutable state sits behind its own lock; no guard is
//! ever held across an `.await`.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::assessment::{AnalysisError, AssessmentService, ModelError, Outcome};
use crate::auth::{AuthStore, FileStorage, KeyValueStorage, LoginError, StorageError};
use crate::chat::{ChatError, Transcript};
use crate::config::AppConfig;
use crate::forms::{FormError, FormState};
use crate::models::{
    ChatMessage, ClaimPredictionResult, ClaimRecord, Identity, LiverPanelRecord, PredictionResult,
};

pub type LiverForm = FormState<LiverPanelRecord, PredictionResult>;
pub type ClaimForm = FormState<ClaimRecord, ClaimPredictionResult>;

/// The two assessment forms on the prediction page.
#[derive(Debug, Default)]
pub struct Workspace {
    pub liver: LiverForm,
    pub claim: ClaimForm,
}

impl Workspace {
    fn liver_form(&mut self) -> &mut LiverForm {
        &mut self.liver
    }

    fn claim_form(&mut self) -> &mut ClaimForm {
        &mut self.claim
    }
}

pub struct CoreState {
    pub config: AppConfig,
    auth: RwLock<AuthStore>,
    assessment: AssessmentService,
    workspace: Mutex<Workspace>,
    chat: Mutex<Transcript>,
}

impl CoreState {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        assessment: AssessmentService,
    ) -> Self {
        let mut auth = AuthStore::new(storage);
        auth.restore();
        Self {
            config,
            auth: RwLock::new(auth),
            assessment,
            workspace: Mutex::new(Workspace::default()),
            chat: Mutex::new(Transcript::new()),
        }
    }

    /// File-backed identity storage under the data directory and a model
    /// mode chosen from the configured credential.
    pub fn from_config(config: AppConfig) -> Result<Self, CoreError> {
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        let assessment = AssessmentService::from_config(&config)?;
        Ok(Self::new(config, storage, assessment))
    }

    pub fn assessment(&self) -> &AssessmentService {
        &self.assessment
    }

    // ── Auth ────────────────────────────────────────────────

    fn read_auth(&self) -> Result<RwLockReadGuard<'_, AuthStore>, CoreError> {
        self.auth.read().map_err(|_| CoreError::LockPoisoned)
    }

    fn write_auth(&self) -> Result<RwLockWriteGuard<'_, AuthStore>, CoreError> {
        self.auth.write().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn current_identity(&self) -> Result<Option<Identity>, CoreError> {
        Ok(self.read_auth()?.current().cloned())
    }

    pub fn require_identity(&self) -> Result<Identity, CoreError> {
        self.current_identity()?.ok_or(CoreError::NotAuthenticated)
    }

    /// Simulated round trip, then local validation.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, CoreError> {
        if !self.config.login_delay.is_zero() {
            tokio::time::sleep(self.config.login_delay).await;
        }
        let identity = self.write_auth()?.login(email, password)?;
        Ok(identity)
    }

    /// Forget the identity and everything entered during the session.
    pub fn logout(&self) -> Result<(), CoreError> {
        let removed = self.write_auth()?.logout();
        *self.lock_workspace()? = Workspace::default();
        self.lock_chat()?.clear();
        removed?;
        Ok(())
    }

    // ── Forms ───────────────────────────────────────────────

    fn lock_workspace(&self) -> Result<MutexGuard<'_, Workspace>, CoreError> {
        self.workspace.lock().map_err(|_| CoreError::LockPoisoned)
    }

    /// Run `f` against the workspace under its lock.
    pub fn with_workspace<U>(&self, f: impl FnOnce(&mut Workspace) -> U) -> Result<U, CoreError> {
        let mut workspace = self.lock_workspace()?;
        Ok(f(&mut workspace))
    }

    pub async fn submit_liver(&self) -> Result<(), CoreError> {
        self.submit(
            Workspace::liver_form,
            |record| async move { self.assessment.assess_liver_risk(&record).await },
        )
        .await
    }

    pub async fn submit_claim(&self) -> Result<(), CoreError> {
        self.submit(
            Workspace::claim_form,
            |record| async move { self.assessment.assess_claim_fraud(&record).await },
        )
        .await
    }

    /// Snapshot under the lock, assess without it, apply under it again.
    ///
    /// A failed assessment is recorded on the form and also returned. A
    /// completion for a form reset in the meantime is dropped silently.
    async fn submit<R, T, F, Fut>(
        &self,
        select: fn(&mut Workspace) -> &mut FormState<R, T>,
        assess: F,
    ) -> Result<(), CoreError>
    where
        R: crate::models::Record,
        F: FnOnce(R) -> Fut,
        Fut: Future<Output = Result<Outcome<T>, AnalysisError>>,
    {
        let ticket = select(&mut *self.lock_workspace()?).begin_submit()?;
        let outcome = assess(ticket.record.clone()).await;
        let failure = outcome.as_ref().err().cloned();

        let applied = select(&mut *self.lock_workspace()?).finish_submit(ticket, outcome);
        if !applied {
            tracing::debug!("Discarded stale assessment");
        }
        match failure {
            Some(err) if applied => Err(err.into()),
            _ => Ok(()),
        }
    }

    // ── Chat ────────────────────────────────────────────────

    fn lock_chat(&self) -> Result<MutexGuard<'_, Transcript>, CoreError> {
        self.chat.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn chat_messages(&self) -> Result<Vec<ChatMessage>, CoreError> {
        Ok(self.lock_chat()?.messages().to_vec())
    }

    /// Append the user's message, ask the model, append its reply.
    pub async fn send_chat(&self, text: &str) -> Result<ChatMessage, CoreError> {
        let exchange = self.lock_chat()?.push_user(text)?;
        let reply = self
            .assessment
            .continue_chat(&exchange.history, &exchange.message.text)
            .await?
            .into_inner();

        self.lock_chat()?
            .push_model(&exchange, &reply)
            .ok_or(CoreError::ChatCleared)
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Not logged in")]
    NotAuthenticated,
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Model client setup failed: {0}")]
    ModelSetup(#[from] ModelError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("Conversation was cleared before the reply arrived")]
    ChatCleared,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{MockModelClient, ModelMode, ANALYSIS_FAILED_MESSAGE};
    use crate::auth::{MemoryStorage, STORAGE_KEY};
    use crate::models::{ChatRole, RiskLevel};
    use crate::personas;

    fn fallback_state() -> (CoreState, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::default());
        let config = AppConfig::for_tests(std::env::temp_dir());
        let service = AssessmentService::from_config(&config).unwrap();
        (CoreState::new(config, storage.clone(), service), storage)
    }

    fn live_state(client: Arc<MockModelClient>) -> CoreState {
        let config = AppConfig::for_tests(std::env::temp_dir());
        let service = AssessmentService::new(ModelMode::Live(client));
        CoreState::new(config, Arc::new(MemoryStorage::default()), service)
    }

    const LIVER_REPLY: &str = r#"{"riskLevel":"High","probability":88,"analysis":"Cholestatic pattern.","recommendations":["Ultrasound"]}"#;

    #[tokio::test]
    async fn login_then_logout_round_trip() {
        let (state, storage) = fallback_state();
        assert!(state.current_identity().unwrap().is_none());

        let identity = state.login("doc@hospital.com", "secret1").await.unwrap();
        assert_eq!(state.require_identity().unwrap(), identity);
        assert!(storage.get(STORAGE_KEY).unwrap().is_some());

        state.logout().unwrap();
        assert!(matches!(state.require_identity(), Err(CoreError::NotAuthenticated)));
        assert!(storage.get(STORAGE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_login_creates_no_identity() {
        let (state, _) = fallback_state();
        let err = state.login("x@y.com", "short").await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
        assert!(state.current_identity().unwrap().is_none());
    }

    #[test]
    fn stored_identity_is_restored_on_construction() {
        let storage = Arc::new(MemoryStorage::default());
        let mut auth = AuthStore::new(storage.clone());
        auth.login("doc@hospital.com", "secret1").unwrap();

        let config = AppConfig::for_tests(std::env::temp_dir());
        let service = AssessmentService::from_config(&config).unwrap();
        let state = CoreState::new(config, storage, service);
        assert_eq!(state.require_identity().unwrap().email, "doc@hospital.com");
    }

    #[tokio::test]
    async fn submit_without_credential_stores_placeholder() {
        let (state, _) = fallback_state();
        state
            .with_workspace(|ws| ws.liver.apply_persona(personas::liver_persona("low").unwrap().record))
            .unwrap();
        state.submit_liver().await.unwrap();

        let result = state.with_workspace(|ws| ws.liver.result().cloned()).unwrap().unwrap();
        assert!(result.is_fallback());
        assert_eq!(result.value().risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn submit_with_blank_fields_is_refused() {
        let (state, _) = fallback_state();
        let err = state.submit_claim().await.unwrap_err();
        assert!(matches!(err, CoreError::Form(FormError::MissingRequired(_))));
    }

    #[tokio::test]
    async fn live_submit_applies_parsed_result() {
        let client = Arc::new(MockModelClient::new(LIVER_REPLY));
        let state = live_state(client.clone());
        state
            .with_workspace(|ws| ws.liver.apply_persona(personas::liver_persona("high").unwrap().record))
            .unwrap();
        state.submit_liver().await.unwrap();

        let result = state.with_workspace(|ws| ws.liver.result().cloned()).unwrap().unwrap();
        assert!(!result.is_fallback());
        assert_eq!(result.value().risk_level, RiskLevel::High);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn failed_submit_records_normalized_error() {
        let state = live_state(Arc::new(MockModelClient::new("not json")));
        state
            .with_workspace(|ws| ws.claim.apply_persona(personas::claim_persona("medium").unwrap().record))
            .unwrap();
        let err = state.submit_claim().await.unwrap_err();
        assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);

        let form_error = state
            .with_workspace(|ws| ws.claim.error().map(str::to_string))
            .unwrap();
        assert_eq!(form_error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn logout_resets_workspace_and_transcript() {
        let (state, _) = fallback_state();
        state.login("doc@hospital.com", "secret1").await.unwrap();
        state
            .with_workspace(|ws| ws.liver.set_field("age", "40"))
            .unwrap()
            .unwrap();
        state.send_chat("Hello").await.unwrap();
        assert_eq!(state.chat_messages().unwrap().len(), 3);

        state.logout().unwrap();
        let record = state.with_workspace(|ws| ws.liver.record().clone()).unwrap();
        assert_eq!(record, LiverPanelRecord::default());
        assert_eq!(state.chat_messages().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn chat_appends_user_message_then_reply() {
        let client = Arc::new(MockModelClient::new("ALT is the more liver-specific enzyme."));
        let state = live_state(client.clone());
        let reply = state.send_chat("ALT or AST?").await.unwrap();
        assert_eq!(reply.role, ChatRole::Model);

        let messages = state.chat_messages().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, "ALT or AST?");
        assert_eq!(messages[2].text, "ALT is the more liver-specific enzyme.");
    }

    #[tokio::test]
    async fn failed_chat_keeps_only_user_message() {
        let state = live_state(Arc::new(MockModelClient::failing(ModelError::Timeout(60))));
        let err = state.send_chat("Anyone there?").await.unwrap_err();
        assert!(matches!(err, CoreError::Analysis(_)));

        let messages = state.chat_messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[tokio::test]
    async fn blank_chat_message_is_rejected() {
        let (state, _) = fallback_state();
        let err = state.send_chat("  ").await.unwrap_err();
        assert!(matches!(err, CoreError::Chat(ChatError::EmptyMessage)));
        assert_eq!(state.chat_messages().unwrap().len(), 1);
    }
}
