//! Configuration validation
//!
//! Validation runs as a separate pass after parsing so callers can inspect a
//! parsed-but-invalid document. Everything here fails at load time; a config
//! that validates will not produce credential or template surprises during a
//! batch run.

use std::collections::HashSet;

use crate::config::types::ArenaConfig;
use crate::errors::ArenaError;
use crate::evaluator::{AGENT_RESPONSE_PLACEHOLDER, TASK_PROMPT_PLACEHOLDER};

pub const MIN_TASK_AGENTS: usize = 2;
pub const MAX_TASK_AGENTS: usize = 5;
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ArenaError> {
        self.validate_timeouts()?;
        self.validate_task_agents()?;
        self.validate_evaluation_agent()?;
        Ok(())
    }

    fn validate_timeouts(&self) -> Result<(), ArenaError> {
        for (label, seconds) in [
            ("execution", self.execution.timeout_seconds),
            ("evaluation", self.evaluation_agent.timeout_seconds),
        ] {
            if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&seconds) {
                return Err(ArenaError::ConfigError(format!(
                    "{} timeout must be between {} and {} seconds, got {}",
                    label, MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS, seconds
                )));
            }
        }
        Ok(())
    }

    fn validate_task_agents(&self) -> Result<(), ArenaError> {
        let count = self.task_agents.len();
        if !(MIN_TASK_AGENTS..=MAX_TASK_AGENTS).contains(&count) {
            return Err(ArenaError::ConfigError(format!(
                "Between {} and {} task agents required, got {}",
                MIN_TASK_AGENTS, MAX_TASK_AGENTS, count
            )));
        }

        let mut seen = HashSet::new();
        for agent in &self.task_agents {
            if agent.model.trim().is_empty() {
                return Err(ArenaError::ConfigError(
                    "Task agent model must not be empty".to_string(),
                ));
            }
            if !seen.insert((agent.provider, agent.model.as_str())) {
                return Err(ArenaError::ConfigError(format!(
                    "Duplicate task agent: {}/{}",
                    agent.provider, agent.model
                )));
            }
            agent.resolve_api_key()?;
        }
        Ok(())
    }

    fn validate_evaluation_agent(&self) -> Result<(), ArenaError> {
        if self.evaluation_agent.model.trim().is_empty() {
            return Err(ArenaError::ConfigError(
                "Evaluation agent model must not be empty".to_string(),
            ));
        }
        for placeholder in [TASK_PROMPT_PLACEHOLDER, AGENT_RESPONSE_PLACEHOLDER] {
            if !self.evaluation_agent.prompt.contains(placeholder) {
                return Err(ArenaError::ConfigError(format!(
                    "Evaluation prompt template is missing the '{}' placeholder",
                    placeholder
                )));
            }
        }
        self.evaluation_agent.resolve_api_key()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_EVALUATION_PROMPT;
    use crate::config::types::{
        AgentModelConfig, EvaluationConfig, ExecutionConfig, Provider,
    };
    use serial_test::serial;

    fn agent(provider: Provider, model: &str) -> AgentModelConfig {
        AgentModelConfig {
            provider,
            model: model.to_string(),
            api_key_env: "ARENA_TEST_KEY".to_string(),
        }
    }

    fn config_with_agents(agents: Vec<AgentModelConfig>) -> ArenaConfig {
        ArenaConfig {
            execution: ExecutionConfig::default(),
            task_agents: agents,
            evaluation_agent: EvaluationConfig {
                provider: Provider::OpenAi,
                model: "gpt-4o-mini".to_string(),
                api_key_env: "ARENA_TEST_KEY".to_string(),
                prompt: DEFAULT_EVALUATION_PROMPT.to_string(),
                timeout_seconds: 30,
            },
        }
    }

    fn valid_config() -> ArenaConfig {
        config_with_agents(vec![
            agent(Provider::OpenAi, "gpt-4o"),
            agent(Provider::Anthropic, "claude-sonnet-4"),
        ])
    }

    #[test]
    #[serial]
    fn test_valid_config_passes() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_agent_count_bounds() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let too_few = config_with_agents(vec![agent(Provider::OpenAi, "gpt-4o")]);
        assert!(too_few.validate().is_err());

        let too_many = config_with_agents(
            (0..6)
                .map(|i| agent(Provider::OpenAi, &format!("model-{}", i)))
                .collect(),
        );
        assert!(too_many.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_duplicate_provider_model_rejected() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let config = config_with_agents(vec![
            agent(Provider::OpenAi, "gpt-4o"),
            agent(Provider::OpenAi, "gpt-4o"),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_same_model_different_provider_allowed() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let config = config_with_agents(vec![
            agent(Provider::OpenAi, "llama-3.3-70b"),
            agent(Provider::Groq, "llama-3.3-70b"),
        ]);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_timeout_bounds() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let mut config = valid_config();
        config.execution.timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.execution.timeout_seconds = 601;
        assert!(config.validate().is_err());
        config.execution.timeout_seconds = 600;
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_missing_placeholder_rejected() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let mut config = valid_config();
        config.evaluation_agent.prompt = "Rate {task_prompt} only".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_unresolved_credential_is_load_time_failure() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        std::env::remove_var("ARENA_MISSING_KEY");
        let mut config = valid_config();
        config.task_agents[0].api_key_env = "ARENA_MISSING_KEY".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_empty_credential_rejected() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        std::env::set_var("ARENA_EMPTY_KEY", "   ");
        let mut config = valid_config();
        config.evaluation_agent.api_key_env = "ARENA_EMPTY_KEY".to_string();
        assert!(config.validate().is_err());
    }
}
