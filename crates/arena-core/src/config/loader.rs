//! Configuration loader for YAML files

use std::path::Path;

use tokio::fs;

use crate::config::types::ArenaConfig;
use crate::errors::ArenaError;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ArenaConfig, ArenaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            ArenaError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_str(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn from_str(content: &str) -> Result<ArenaConfig, ArenaError> {
        let config: ArenaConfig = serde_yaml::from_str(content)
            .map_err(|e| ArenaError::ConfigError(format!("Failed to parse YAML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Provider;
    use serial_test::serial;
    use std::io::Write;

    const VALID_YAML: &str = r#"
execution:
  timeout_seconds: 45

task_agents:
  - provider: openai
    model: gpt-4o
    api_key_env: ARENA_TEST_KEY
  - provider: gemini
    model: gemini-2.0-flash
    api_key_env: ARENA_TEST_KEY

evaluation_agent:
  provider: anthropic
  model: claude-sonnet-4
  api_key_env: ARENA_TEST_KEY
  prompt: "Task: {task_prompt} Answer: {agent_response} Score it."
  timeout_seconds: 20
"#;

    #[test]
    #[serial]
    fn test_parse_valid_yaml() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let config = ConfigLoader::from_str(VALID_YAML).unwrap();
        assert_eq!(config.execution.timeout_seconds, 45);
        assert_eq!(config.task_agents.len(), 2);
        assert_eq!(config.task_agents[1].provider, Provider::Gemini);
        assert_eq!(config.evaluation_agent.timeout_seconds, 20);
    }

    #[test]
    #[serial]
    fn test_defaults_are_applied() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let yaml = r#"
task_agents:
  - provider: openai
    model: gpt-4o
    api_key_env: ARENA_TEST_KEY
  - provider: groq
    model: llama-3.3-70b
    api_key_env: ARENA_TEST_KEY

evaluation_agent:
  provider: openai
  model: gpt-4o-mini
  api_key_env: ARENA_TEST_KEY
"#;
        let config = ConfigLoader::from_str(yaml).unwrap();
        assert_eq!(config.execution.timeout_seconds, 60);
        assert_eq!(config.evaluation_agent.timeout_seconds, 30);
        assert!(config.evaluation_agent.prompt.contains("{task_prompt}"));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let result = ConfigLoader::from_str("task_agents: [not: closed");
        assert!(matches!(result, Err(ArenaError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_unknown_provider_rejected() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let yaml = VALID_YAML.replace("provider: openai", "provider: cohere");
        assert!(ConfigLoader::from_str(&yaml).is_err());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_from_file() {
        std::env::set_var("ARENA_TEST_KEY", "sk-test");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_YAML.as_bytes()).unwrap();
        let config = ConfigLoader::from_file(file.path()).await.unwrap();
        assert_eq!(config.task_agents.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let result = ConfigLoader::from_file("/nonexistent/arena.yaml").await;
        assert!(matches!(result, Err(ArenaError::ConfigError(_))));
    }
}
