//! Storage contract and in-memory implementation
//!
//! The pipeline hands fully-formed value objects to a [`Storage`]
//! implementation and consumes id assignment, the ranked leaderboard query
//! and per-model aggregate statistics back from it. `MemoryStorage` is the
//! reference implementation; each insert is an independent atomic append
//! behind one lock, matching the contract that the storage collaborator
//! serializes its own writes.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config::Provider;
use crate::errors::ArenaError;
use crate::models::{
    AgentExecution, EvaluationResult, ExecutionStatus, ModelStats, TaskSubmission,
};

/// One row of the ranked leaderboard for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub execution_id: i64,
    pub provider: Provider,
    pub model: String,
    pub status: ExecutionStatus,
    pub duration_seconds: Option<f64>,
    pub token_count: Option<u64>,
    pub score: Option<u8>,
    pub explanation: Option<String>,
}

pub trait Storage: Send + Sync {
    fn create_task(&self, task: &TaskSubmission) -> Result<i64, ArenaError>;
    fn create_execution(&self, execution: &AgentExecution) -> Result<i64, ArenaError>;
    /// Persist an evaluation. Re-evaluating an execution is a logical
    /// replace: the previous verdict for the same execution id is dropped.
    fn create_evaluation(&self, evaluation: &EvaluationResult) -> Result<i64, ArenaError>;
    fn executions_for_task(&self, task_id: i64) -> Result<Vec<AgentExecution>, ArenaError>;
    fn evaluation_for_execution(
        &self,
        execution_id: i64,
    ) -> Result<Option<EvaluationResult>, ArenaError>;
    /// All executions of a task joined with their evaluation (if any),
    /// ordered by score descending, then duration ascending. Rows without a
    /// score sort after every scored row.
    fn leaderboard(&self, task_id: i64) -> Result<Vec<LeaderboardRow>, ArenaError>;
    /// Per-(provider, model) aggregates, optionally filtered to one task.
    fn model_stats(&self, task_id: Option<i64>) -> Result<Vec<ModelStats>, ArenaError>;
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    tasks: Vec<TaskSubmission>,
    executions: Vec<AgentExecution>,
    evaluations: Vec<EvaluationResult>,
}

impl MemoryState {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory storage, suitable for tests and single-process runs.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, ArenaError> {
        self.state
            .lock()
            .map_err(|_| ArenaError::StorageError("storage lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn create_task(&self, task: &TaskSubmission) -> Result<i64, ArenaError> {
        let mut state = self.lock()?;
        let id = state.assign_id();
        let mut stored = task.clone();
        stored.id = Some(id);
        state.tasks.push(stored);
        Ok(id)
    }

    fn create_execution(&self, execution: &AgentExecution) -> Result<i64, ArenaError> {
        let mut state = self.lock()?;
        let id = state.assign_id();
        let mut stored = execution.clone();
        stored.id = Some(id);
        state.executions.push(stored);
        Ok(id)
    }

    fn create_evaluation(&self, evaluation: &EvaluationResult) -> Result<i64, ArenaError> {
        let mut state = self.lock()?;
        state
            .evaluations
            .retain(|existing| existing.execution_id != evaluation.execution_id);
        let id = state.assign_id();
        let mut stored = evaluation.clone();
        stored.id = Some(id);
        state.evaluations.push(stored);
        Ok(id)
    }

    fn executions_for_task(&self, task_id: i64) -> Result<Vec<AgentExecution>, ArenaError> {
        let state = self.lock()?;
        Ok(state
            .executions
            .iter()
            .filter(|execution| execution.task_id == task_id)
            .cloned()
            .collect())
    }

    fn evaluation_for_execution(
        &self,
        execution_id: i64,
    ) -> Result<Option<EvaluationResult>, ArenaError> {
        let state = self.lock()?;
        Ok(state
            .evaluations
            .iter()
            .find(|evaluation| evaluation.execution_id == execution_id)
            .cloned())
    }

    fn leaderboard(&self, task_id: i64) -> Result<Vec<LeaderboardRow>, ArenaError> {
        let state = self.lock()?;
        let mut rows: Vec<LeaderboardRow> = state
            .executions
            .iter()
            .filter(|execution| execution.task_id == task_id)
            .filter_map(|execution| {
                let execution_id = execution.id?;
                let evaluation = state
                    .evaluations
                    .iter()
                    .find(|evaluation| evaluation.execution_id == execution_id);
                Some(LeaderboardRow {
                    execution_id,
                    provider: execution.provider,
                    model: execution.model.clone(),
                    status: execution.status,
                    duration_seconds: execution.duration_seconds,
                    token_count: execution.token_count,
                    score: evaluation.map(|e| e.score),
                    explanation: evaluation.map(|e| e.explanation.clone()),
                })
            })
            .collect();
        rows.sort_by(rank_rows);
        Ok(rows)
    }

    fn model_stats(&self, task_id: Option<i64>) -> Result<Vec<ModelStats>, ArenaError> {
        let state = self.lock()?;
        let mut groups: Vec<(Provider, String, Vec<&AgentExecution>)> = Vec::new();
        for execution in state
            .executions
            .iter()
            .filter(|execution| task_id.map_or(true, |id| execution.task_id == id))
        {
            match groups.iter_mut().find(|(provider, model, _)| {
                *provider == execution.provider && *model == execution.model
            }) {
                Some((_, _, members)) => members.push(execution),
                None => groups.push((
                    execution.provider,
                    execution.model.clone(),
                    vec![execution],
                )),
            }
        }

        let mut stats: Vec<ModelStats> = groups
            .into_iter()
            .map(|(provider, model, members)| {
                let durations: Vec<f64> = members
                    .iter()
                    .filter_map(|execution| execution.duration_seconds)
                    .collect();
                let tokens: Vec<f64> = members
                    .iter()
                    .filter_map(|execution| execution.token_count.map(|t| t as f64))
                    .collect();
                ModelStats {
                    provider,
                    model,
                    execution_count: members.len(),
                    mean_duration_seconds: mean(&durations),
                    stddev_duration_seconds: stddev(&durations),
                    min_duration_seconds: durations.iter().copied().reduce(f64::min),
                    max_duration_seconds: durations.iter().copied().reduce(f64::max),
                    mean_tokens: mean(&tokens),
                    stddev_tokens: stddev(&tokens),
                }
            })
            .collect();
        stats.sort_by(|a, b| (a.provider, &a.model).cmp(&(b.provider, &b.model)));
        Ok(stats)
    }
}

/// Score descending, duration ascending; unscored rows last, then by
/// duration.
fn rank_rows(a: &LeaderboardRow, b: &LeaderboardRow) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a.score, b.score) {
        (Some(sa), Some(sb)) => sb
            .cmp(&sa)
            .then_with(|| compare_durations(a.duration_seconds, b.duration_seconds)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_durations(a.duration_seconds, b.duration_seconds),
    }
}

fn compare_durations(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation.
fn stddev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}
