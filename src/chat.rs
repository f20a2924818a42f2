//! Assistant chat transcript.
//!
//! The transcript is append-only within a session. A user message is
//! appended before the model is called; the reply is appended only if the
//! call succeeds and the transcript has not been cleared in the meantime.

use crate::models::{ChatMessage, ChatRole};

pub const GREETING: &str = "Hello, Doctor. How can I assist you with the diagnosis today?";
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Message too long (max {MAX_MESSAGE_CHARS} chars)")]
    TooLong,
}

/// An exchange in progress: the history sent to the model and the new
/// user message already appended to the transcript.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    generation: u64,
    pub history: Vec<ChatMessage>,
    pub message: ChatMessage,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    generation: u64,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A transcript opened by the assistant's greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Model, GREETING)],
            generation: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a user message and return what to send to the model.
    pub fn push_user(&mut self, text: &str) -> Result<PendingExchange, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ChatError::TooLong);
        }

        let history = self.messages.clone();
        let message = ChatMessage::new(ChatRole::User, text);
        self.messages.push(message.clone());

        Ok(PendingExchange {
            generation: self.generation,
            history,
            message,
        })
    }

    /// Append the model's reply. Returns `None` when the transcript was
    /// cleared after the exchange began.
    pub fn push_model(&mut self, exchange: &PendingExchange, reply: &str) -> Option<ChatMessage> {
        if exchange.generation != self.generation {
            return None;
        }
        let message = ChatMessage::new(ChatRole::Model, reply);
        self.messages.push(message.clone());
        Some(message)
    }

    /// Start over from the greeting.
    pub fn clear(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new();
        self.generation = generation;
    }
}
