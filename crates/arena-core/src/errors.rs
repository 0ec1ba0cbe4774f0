//! Error types for the arena execution and evaluation pipeline
//!
//! Two error hierarchies live here. `ArenaError` covers the broad failure
//! modes of the pipeline (agent invocation, configuration, storage), while
//! `EvalError` gives the evaluator its own closed set of named failure
//! conditions so callers can decide per-variant whether to retry, skip the
//! execution, or abort the batch.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ArenaError {
    #[error("Agent invocation failed: {0}")]
    AgentError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Precondition violated: {0}")]
    PreconditionError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ArenaError {
    fn from(err: std::io::Error) -> Self {
        ArenaError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for ArenaError {
    fn from(err: reqwest::Error) -> Self {
        ArenaError::AgentError(err.to_string())
    }
}

/// Failure conditions of the evaluation step.
///
/// Evaluation timeouts are always surfaced through `Timeout`, never silently
/// converted to a zero score.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("Evaluation prompt template is missing the '{placeholder}' placeholder")]
    MissingPlaceholder { placeholder: &'static str },
    #[error("Evaluation timed out after {seconds} seconds")]
    Timeout { seconds: f64 },
    #[error("Evaluation agent failed: {0}")]
    AgentFailed(String),
    #[error("Evaluation agent returned no response text")]
    EmptyResponse,
    #[error("Could not extract a score from evaluation response: {excerpt:?}")]
    ScoreNotFound { excerpt: String },
    #[error("Score must be between 0 and 100, got {0}")]
    ScoreOutOfRange(i64),
    #[error("Could not extract a non-empty explanation from evaluation response")]
    EmptyExplanation,
    #[error("Invalid evaluation result: {0}")]
    Invalid(String),
}
