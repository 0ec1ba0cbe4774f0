//! Agent-runtime boundary and the OpenAI-compatible HTTP client
//!
//! The pipeline treats "run a prompt against a model, get back a structured
//! trace plus optional usage metadata" as a capability behind the [`Agent`]
//! trait. `HttpAgent` is the production implementation, speaking the
//! OpenAI-compatible chat-completions dialect that every supported provider
//! exposes. Tests substitute scripted mock agents.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::{AgentModelConfig, EvaluationConfig, Provider};
use crate::errors::ArenaError;
use crate::trace::{TraceMessage, TracePart};

/// Token usage reported by a backend for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// The full outcome of one agent invocation: the normalized interaction log
/// plus backend-reported usage when available.
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub messages: Vec<TraceMessage>,
    pub usage: Option<Usage>,
}

#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<AgentRun, ArenaError>;
}

/// Chat-completions client for one configured (provider, model) pair.
#[derive(Debug, Clone)]
pub struct HttpAgent {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl HttpAgent {
    pub fn new(provider: Provider, model: impl Into<String>, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_base: provider.api_base().to_string(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(config: &AgentModelConfig) -> Result<Self, ArenaError> {
        let api_key = config.resolve_api_key()?;
        Ok(Self::new(config.provider, config.model.clone(), api_key))
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn parse_usage(value: &Value) -> Option<Usage> {
        let usage = value.get("usage")?;
        Some(Usage {
            prompt_tokens: usage.get("prompt_tokens")?.as_u64()?,
            completion_tokens: usage.get("completion_tokens")?.as_u64()?,
            total_tokens: usage.get("total_tokens")?.as_u64()?,
        })
    }
}

#[async_trait]
impl Agent for HttpAgent {
    async fn run(&self, prompt: &str) -> Result<AgentRun, ArenaError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let url = format!("{}/chat/completions", self.api_base);
        log::debug!("HttpAgent sending request to {} for {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(ArenaError::AgentError(format!(
                "Chat completions request failed with status {}: {}",
                status, error_text
            )));
        }

        let value: Value = response.json().await?;
        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let usage = Self::parse_usage(&value);

        let messages = vec![
            TraceMessage::request(vec![TracePart::text(prompt)]),
            TraceMessage::response(vec![TracePart::text(content)]),
        ];
        Ok(AgentRun { messages, usage })
    }
}

/// Build one HTTP agent per task-agent config, in config order.
pub fn build_agents(configs: &[AgentModelConfig]) -> Result<Vec<Arc<dyn Agent>>, ArenaError> {
    configs
        .iter()
        .map(|config| {
            HttpAgent::from_config(config).map(|agent| Arc::new(agent) as Arc<dyn Agent>)
        })
        .collect()
}

/// Build the evaluator agent. Evaluators are plain text-in/text-out; they
/// never carry a tool registry.
pub fn build_eval_agent(config: &EvaluationConfig) -> Result<Arc<dyn Agent>, ArenaError> {
    let api_key = config.resolve_api_key()?;
    Ok(Arc::new(HttpAgent::new(
        config.provider,
        config.model.clone(),
        api_key,
    )))
}
