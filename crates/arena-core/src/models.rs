//! Domain value objects for tasks, executions and evaluations
//!
//! These types are exclusively owned by the orchestrating call until they are
//! handed to a [`Storage`](crate::storage::Storage) implementation, which
//! assigns their persisted ids. Executions transition exactly once from
//! `Running` to a terminal status and are immutable afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ArenaError;
use crate::config::Provider;

/// A user-submitted natural-language task prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub id: Option<i64>,
    pub prompt: String,
    pub submitted_at: DateTime<Utc>,
}

impl TaskSubmission {
    pub fn new(prompt: impl Into<String>) -> Result<Self, ArenaError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ArenaError::ValidationError(
                "Task prompt must not be empty after trimming whitespace".to_string(),
            ));
        }
        Ok(Self {
            id: None,
            prompt,
            submitted_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
    Timeout,
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Running)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionStatus::Running => "running",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Timeout => "timeout",
        };
        write!(f, "{}", s)
    }
}

/// One agent's attempt at one task.
///
/// `raw_trace` holds the serialized interaction log of the attempt. It is
/// absent only on the timeout path; a failed attempt stores a minimal error
/// marker so downstream consumers always receive some trace document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecution {
    pub id: Option<i64>,
    pub task_id: i64,
    pub provider: Provider,
    pub model: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub token_count: Option<u64>,
    pub raw_trace: Option<String>,
}

impl AgentExecution {
    pub fn new(task_id: i64, provider: Provider, model: impl Into<String>) -> Self {
        Self {
            id: None,
            task_id,
            provider,
            model: model.into(),
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            duration_seconds: None,
            token_count: None,
            raw_trace: None,
        }
    }

    /// Combined "provider/model" identifier.
    pub fn model_identifier(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }

    pub fn mark_completed(&mut self) {
        self.finish(ExecutionStatus::Completed);
    }

    pub fn mark_failed(&mut self) {
        self.finish(ExecutionStatus::Failed);
    }

    pub fn mark_timeout(&mut self) {
        self.finish(ExecutionStatus::Timeout);
    }

    fn finish(&mut self, status: ExecutionStatus) {
        if self.status.is_terminal() {
            log::warn!(
                "Ignoring {} transition for already-terminal execution {}",
                status,
                self.model_identifier()
            );
            return;
        }
        self.status = status;
        let completed_at = Utc::now();
        self.completed_at = Some(completed_at);
        // Clamp at zero so clock adjustments can never yield a negative span.
        let secs = (completed_at - self.started_at).num_milliseconds() as f64 / 1000.0;
        self.duration_seconds = Some(secs.max(0.0));
    }
}

/// The evaluator's verdict on one execution. At most one per execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub id: Option<i64>,
    pub execution_id: i64,
    pub score: u8,
    pub explanation: String,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    pub fn new(
        execution_id: i64,
        score: u8,
        explanation: impl Into<String>,
    ) -> Result<Self, ArenaError> {
        let explanation = explanation.into();
        if score > 100 {
            return Err(ArenaError::ValidationError(format!(
                "Score must be between 0 and 100, got {}",
                score
            )));
        }
        if explanation.trim().is_empty() {
            return Err(ArenaError::ValidationError(
                "Explanation must not be empty after trimming whitespace".to_string(),
            ));
        }
        Ok(Self {
            id: None,
            execution_id,
            score,
            explanation,
            evaluated_at: Utc::now(),
        })
    }

    pub fn is_passing(&self) -> bool {
        self.score >= 50
    }

    pub fn grade(&self) -> char {
        match self.score {
            90..=100 => 'A',
            80..=89 => 'B',
            70..=79 => 'C',
            60..=69 => 'D',
            _ => 'F',
        }
    }
}

/// Aggregate statistics for one (provider, model) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    pub provider: Provider,
    pub model: String,
    pub execution_count: usize,
    pub mean_duration_seconds: Option<f64>,
    pub stddev_duration_seconds: Option<f64>,
    pub min_duration_seconds: Option<f64>,
    pub max_duration_seconds: Option<f64>,
    pub mean_tokens: Option<f64>,
    pub stddev_tokens: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_rejects_empty_prompt() {
        assert!(TaskSubmission::new("   ").is_err());
        assert!(TaskSubmission::new("").is_err());
        assert!(TaskSubmission::new("find primes").is_ok());
    }

    #[test]
    fn test_execution_starts_running_without_results() {
        let execution = AgentExecution::new(1, Provider::OpenAi, "gpt-4o");
        assert_eq!(execution.status, ExecutionStatus::Running);
        assert!(execution.completed_at.is_none());
        assert!(execution.duration_seconds.is_none());
        assert!(execution.raw_trace.is_none());
        assert_eq!(execution.model_identifier(), "openai/gpt-4o");
    }

    #[test]
    fn test_terminal_transition_sets_duration() {
        let mut execution = AgentExecution::new(1, Provider::Anthropic, "claude-sonnet-4");
        execution.mark_completed();
        assert_eq!(execution.status, ExecutionStatus::Completed);
        assert!(execution.completed_at.is_some());
        let duration = execution.duration_seconds.unwrap();
        assert!(duration >= 0.0);
    }

    #[test]
    fn test_terminal_status_is_sticky() {
        let mut execution = AgentExecution::new(1, Provider::Gemini, "gemini-2.0-flash");
        execution.mark_timeout();
        execution.mark_completed();
        assert_eq!(execution.status, ExecutionStatus::Timeout);
    }

    #[test]
    fn test_evaluation_score_bounds() {
        assert!(EvaluationResult::new(1, 0, "ok").is_ok());
        assert!(EvaluationResult::new(1, 100, "ok").is_ok());
        assert!(EvaluationResult::new(1, 101, "ok").is_err());
        assert!(EvaluationResult::new(1, 150, "ok").is_err());
    }

    #[test]
    fn test_evaluation_rejects_blank_explanation() {
        assert!(EvaluationResult::new(1, 80, "").is_err());
        assert!(EvaluationResult::new(1, 80, "  \n\t ").is_err());
    }

    #[test]
    fn test_grades_and_passing() {
        let result = EvaluationResult::new(1, 92, "solid").unwrap();
        assert_eq!(result.grade(), 'A');
        assert!(result.is_passing());

        let result = EvaluationResult::new(1, 49, "weak").unwrap();
        assert_eq!(result.grade(), 'F');
        assert!(!result.is_passing());
    }
}
