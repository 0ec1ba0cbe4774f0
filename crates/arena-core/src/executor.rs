//! Agent execution orchestration
//!
//! Runs one task prompt against one or many configured agents under a shared
//! per-agent deadline. A single execution never returns an error: agent
//! failures become `Failed` status with an error-marker trace, deadline
//! expiry becomes `Timeout` with no trace. The multi-agent fan-out is
//! concurrent, so batch wall time tracks the slowest agent rather than the
//! sum, and the returned list always matches input order.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde_json::json;

use crate::agent::Agent;
use crate::config::AgentModelConfig;
use crate::errors::ArenaError;
use crate::models::AgentExecution;
use crate::timeout::with_timeout;

/// Execute a single agent with timeout handling. Infallible by design: the
/// outcome is always encoded in the returned execution's status.
pub async fn execute_single_agent(
    agent: &Arc<dyn Agent>,
    prompt: &str,
    config: &AgentModelConfig,
    task_id: i64,
    timeout: Duration,
) -> AgentExecution {
    let mut execution = AgentExecution::new(task_id, config.provider, config.model.clone());
    log::info!("Dispatching {} for task {}", execution.model_identifier(), task_id);

    match with_timeout(agent.run(prompt), timeout).await {
        None => {
            log::warn!(
                "{} timed out after {:?} for task {}",
                execution.model_identifier(),
                timeout,
                task_id
            );
            execution.mark_timeout();
        }
        Some(Ok(run)) => {
            execution.mark_completed();
            execution.raw_trace = match serde_json::to_string(&run.messages) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    // Trace serialization failing is effectively unreachable
                    // for these types; keep the error-marker contract anyway.
                    Some(json!({ "error": err.to_string() }).to_string())
                }
            };
            execution.token_count = run.usage.map(|usage| usage.total_tokens);
        }
        Some(Err(err)) => {
            log::warn!(
                "{} failed for task {}: {}",
                execution.model_identifier(),
                task_id,
                err
            );
            execution.mark_failed();
            execution.raw_trace = Some(json!({ "error": err.to_string() }).to_string());
        }
    }

    execution
}

/// Execute all agents concurrently against the same prompt.
///
/// The agent and config lists must pair up index-by-index; a length mismatch
/// fails fast before anything is dispatched. The returned executions are in
/// input order regardless of completion order, and one agent's failure or
/// timeout never cancels its siblings.
pub async fn execute_multi_agent(
    agents: &[Arc<dyn Agent>],
    configs: &[AgentModelConfig],
    prompt: &str,
    task_id: i64,
    timeout: Duration,
) -> Result<Vec<AgentExecution>, ArenaError> {
    if agents.len() != configs.len() {
        return Err(ArenaError::PreconditionError(format!(
            "Agents count ({}) must match configs count ({})",
            agents.len(),
            configs.len()
        )));
    }

    let executions = join_all(
        agents
            .iter()
            .zip(configs)
            .map(|(agent, config)| execute_single_agent(agent, prompt, config, task_id, timeout)),
    )
    .await;

    Ok(executions)
}
