//! Configuration type definitions for the arena pipeline
//!
//! Credentials are always referenced indirectly through environment variable
//! names; the secret itself never appears in a config value. Resolution
//! happens at validation time so a missing key is a load-time failure rather
//! than a mid-batch surprise.

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    default_eval_prompt, default_eval_timeout, default_execution_timeout,
};
use crate::errors::ArenaError;

/// Supported model backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
    Groq,
    HuggingFace,
}

impl Provider {
    /// OpenAI-compatible chat-completions base URL for this backend.
    pub fn api_base(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::HuggingFace => "https://router.huggingface.co/v1",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Groq => "groq",
            Provider::HuggingFace => "huggingface",
        };
        write!(f, "{}", s)
    }
}

/// One callable task agent: backend, model and credential reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentModelConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key_env: String,
}

impl AgentModelConfig {
    /// Resolve the credential reference to the actual key.
    pub fn resolve_api_key(&self) -> Result<String, ArenaError> {
        resolve_env_key(&self.api_key_env)
    }
}

/// Execution behavior for the task-agent fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_execution_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_execution_timeout(),
        }
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// The evaluator agent plus its prompt template and independent timeout.
/// A slow evaluator never eats into the agent-execution budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key_env: String,
    #[serde(default = "default_eval_prompt")]
    pub prompt: String,
    #[serde(default = "default_eval_timeout")]
    pub timeout_seconds: u64,
}

impl EvaluationConfig {
    pub fn resolve_api_key(&self) -> Result<String, ArenaError> {
        resolve_env_key(&self.api_key_env)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default)]
    pub execution: ExecutionConfig,
    pub task_agents: Vec<AgentModelConfig>,
    pub evaluation_agent: EvaluationConfig,
}

fn resolve_env_key(name: &str) -> Result<String, ArenaError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(ArenaError::ConfigError(format!(
            "Environment variable {} is empty",
            name
        ))),
        Err(_) => Err(ArenaError::ConfigError(format!(
            "Environment variable {} not found",
            name
        ))),
    }
}
