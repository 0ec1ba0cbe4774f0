//! End-to-end task run: execute, extract, evaluate, persist, rank
//!
//! Ties the pipeline stages together for one task prompt. Partial failure is
//! the normal case here: executions that failed or timed out stay in the
//! outcome with their status, and evaluations that could not be produced are
//! recorded as absent rather than aborting the batch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::config::ArenaConfig;
use crate::errors::ArenaError;
use crate::evaluator::evaluate_batch;
use crate::executor::execute_multi_agent;
use crate::models::{AgentExecution, EvaluationResult, TaskSubmission};
use crate::storage::{LeaderboardRow, Storage};
use crate::trace::extract_answer;

/// One execution with its derived answer and optional evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub execution: AgentExecution,
    pub answer: String,
    pub evaluation: Option<EvaluationResult>,
}

/// Everything a presentation layer needs about one finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRunOutcome {
    pub task_id: i64,
    pub prompt: String,
    pub executions: Vec<ExecutionReport>,
    pub leaderboard: Vec<LeaderboardRow>,
}

/// Run one task prompt through the full pipeline.
pub async fn run_task(
    prompt: &str,
    config: &ArenaConfig,
    agents: &[Arc<dyn Agent>],
    eval_agent: &Arc<dyn Agent>,
    storage: &dyn Storage,
) -> Result<TaskRunOutcome, ArenaError> {
    let task = TaskSubmission::new(prompt)?;
    let task_id = storage.create_task(&task)?;
    log::info!(
        "Running task {} against {} agents",
        task_id,
        config.task_agents.len()
    );

    let mut executions = execute_multi_agent(
        agents,
        &config.task_agents,
        prompt,
        task_id,
        config.execution.timeout(),
    )
    .await?;

    for execution in executions.iter_mut() {
        execution.id = Some(storage.create_execution(execution)?);
    }

    let evaluations = evaluate_batch(
        &executions,
        prompt,
        eval_agent,
        &config.evaluation_agent.prompt,
        config.evaluation_agent.timeout(),
    )
    .await;

    let mut reports = Vec::with_capacity(executions.len());
    for (execution, evaluation) in executions.into_iter().zip(evaluations) {
        let evaluation = match evaluation {
            Some(mut evaluation) => {
                evaluation.id = Some(storage.create_evaluation(&evaluation)?);
                Some(evaluation)
            }
            None => None,
        };
        let answer = extract_answer(execution.raw_trace.as_deref());
        reports.push(ExecutionReport {
            execution,
            answer,
            evaluation,
        });
    }

    let leaderboard = storage.leaderboard(task_id)?;
    Ok(TaskRunOutcome {
        task_id,
        prompt: prompt.to_string(),
        executions: reports,
        leaderboard,
    })
}
