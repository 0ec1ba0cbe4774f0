//! Shared test doubles for the agent boundary

use async_trait::async_trait;
use std::time::Duration;

use crate::agent::{Agent, AgentRun, Usage};
use crate::config::{AgentModelConfig, Provider};
use crate::errors::ArenaError;
use crate::trace::{TraceMessage, TracePart};

/// Scripted agent: replies with fixed text, fixed messages, or an error,
/// after an optional artificial delay.
pub struct MockAgent {
    reply: MockReply,
    delay: Option<Duration>,
    tokens: Option<u64>,
}

enum MockReply {
    Text(String),
    Messages(Vec<TraceMessage>),
    Error(String),
}

impl MockAgent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Text(content.into()),
            delay: None,
            tokens: None,
        }
    }

    pub fn messages(messages: Vec<TraceMessage>) -> Self {
        Self {
            reply: MockReply::Messages(messages),
            delay: None,
            tokens: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Error(message.into()),
            delay: None,
            tokens: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_tokens(mut self, total: u64) -> Self {
        self.tokens = Some(total);
        self
    }
}

#[async_trait]
impl Agent for MockAgent {
    async fn run(&self, prompt: &str) -> Result<AgentRun, ArenaError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let usage = self.tokens.map(|total| Usage {
            prompt_tokens: 0,
            completion_tokens: total,
            total_tokens: total,
        });
        match &self.reply {
            MockReply::Text(content) => Ok(AgentRun {
                messages: vec![
                    TraceMessage::request(vec![TracePart::text(prompt)]),
                    TraceMessage::response(vec![TracePart::text(content.clone())]),
                ],
                usage,
            }),
            MockReply::Messages(messages) => Ok(AgentRun {
                messages: messages.clone(),
                usage,
            }),
            MockReply::Error(message) => Err(ArenaError::AgentError(message.clone())),
        }
    }
}

pub fn mock_config(provider: Provider, model: &str) -> AgentModelConfig {
    AgentModelConfig {
        provider,
        model: model.to_string(),
        api_key_env: "UNUSED".to_string(),
    }
}
