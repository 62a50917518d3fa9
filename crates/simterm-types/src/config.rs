//! Terminal configuration loaded from TOML.
//!
//! ```toml
//! prompt = "$ "
//! history_capacity = 50
//! completion_limit = 10
//! log_filter = "debug"
//! log_file = "/tmp/simterm.log"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TermError};

/// Runtime settings for the shell and its logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminalConfig {
    /// Text drawn left of the input line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Number of submitted lines kept for recall.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Maximum predictions shown per tab press.
    #[serde(default = "default_completion_limit")]
    pub completion_limit: usize,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Write logs here instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_prompt() -> String {
    "_>".to_string()
}
fn default_history_capacity() -> usize {
    10
}
fn default_completion_limit() -> usize {
    10
}
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            history_capacity: default_history_capacity(),
            completion_limit: default_completion_limit(),
            log_filter: default_log_filter(),
            log_file: None,
        }
    }
}

impl TerminalConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.completion_limit == 0 {
            return Err(TermError::Config(
                "completion_limit must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
