//! Configuration system for the arena pipeline
//!
//! YAML configuration files describe the task-agent set, the evaluator and
//! the timeout budget. Parsing and validation are separate passes; both must
//! succeed before any execution starts.

pub mod defaults;
pub mod loader;
pub mod types;
pub mod validation;

pub use defaults::*;
pub use loader::ConfigLoader;
pub use types::*;

use crate::errors::ArenaError;
use std::path::Path;

/// Load and validate a configuration from a YAML file.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<ArenaConfig, ArenaError> {
    ConfigLoader::from_file(path).await
}
