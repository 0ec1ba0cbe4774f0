//! Core library for running one task prompt against several AI model agents
//! in parallel, scoring each answer with an evaluator agent, and ranking the
//! results on a leaderboard.
//!
//! # Architecture Overview
//!
//! The pipeline is organized around a handful of subsystems:
//!
//! - **Execution orchestration**: concurrent fan-out of configured agents
//!   under a shared per-agent deadline, with per-execution outcome states
//! - **Trace normalization**: one internal trace representation behind an
//!   adapter that tolerates vendor-shaped interaction logs
//! - **Answer extraction and tool-call hierarchy**: pure consumers of the
//!   normalized trace form
//! - **Evaluation**: resilient parsing of free-text grading output into
//!   validated scores with named failure conditions
//! - **Storage contract**: id assignment, ranked leaderboard and per-model
//!   aggregate queries behind a trait, with an in-memory implementation
//! - **Configuration system**: YAML configs validated before any execution

pub mod agent;
pub mod cache;
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod executor;
pub mod models;
pub mod runner;
pub mod storage;
pub mod timeout;
pub mod trace;

pub use agent::{build_agents, build_eval_agent, Agent, AgentRun, HttpAgent, Usage};
pub use cache::ResultCache;
pub use config::{load_config, AgentModelConfig, ArenaConfig, ConfigLoader, Provider};
pub use errors::{ArenaError, EvalError};
pub use executor::{execute_multi_agent, execute_single_agent};
pub use models::{
    AgentExecution, EvaluationResult, ExecutionStatus, ModelStats, TaskSubmission,
};
pub use runner::{run_task, ExecutionReport, TaskRunOutcome};
pub use storage::{LeaderboardRow, MemoryStorage, Storage};
pub use trace::{extract_answer, extract_tool_hierarchy, ToolCallNode};

#[cfg(test)]
pub mod test_utils;
