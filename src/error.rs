//! Error types for prompt invocations

use thiserror::Error;

/// Errors returned by a prompt run
#[derive(Error, Debug)]
pub enum PromptError {
    /// The user aborted the prompt (Ctrl+C / Ctrl+Q)
    #[error("No answer selected!")]
    Cancelled,

    /// Terminal setup, event read or teardown failed
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// A style description could not be parsed
    #[error("Invalid style token '{token}': {reason}")]
    Style { token: String, reason: String },

    /// The background task driving an async prompt did not complete
    #[error("Prompt task failed: {0}")]
    Task(String),
}

impl PromptError {
    /// Whether this error is a user cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromptError::Cancelled)
    }
}

impl From<tokio::task::JoinError> for PromptError {
    fn from(err: tokio::task::JoinError) -> Self {
        PromptError::Task(err.to_string())
    }
}

/// Convenience alias for prompt results
pub type Result<T> = std::result::Result<T, PromptError>;
