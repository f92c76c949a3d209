//! Configuration loading
//!
//! Precedence, lowest to highest: built-in defaults, the global config at
//! `~/.config/alfredo/alfredo.toml`, a local `alfredo.toml`, an explicit
//! `--config` file, and `ALFREDO_*` environment variables.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const LOCAL_CONFIG_FILE: &str = "alfredo.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Model name sent to the gateway
    pub model: String,
    /// OpenAI-compatible API root, e.g. `https://api.openai.com/v1`
    pub api_base: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub max_context_tokens: usize,
    pub recursion_limit: usize,
    pub enable_planning: bool,
    /// Working directory for tools (defaults to the current directory)
    pub working_dir: Option<PathBuf>,
    /// JSONL run log destination
    pub log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_context_tokens: 100_000,
            recursion_limit: 50,
            enable_planning: true,
            working_dir: None,
            log_file: None,
        }
    }
}

impl FileConfig {
    /// Load with the full precedence chain
    pub fn load(explicit: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(FileConfig::default()));
        if let Some(global) = global_config_path() {
            figment = figment.merge(Toml::file(global));
        }
        figment = figment.merge(Toml::file(LOCAL_CONFIG_FILE));
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("ALFREDO_")).extract()
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("alfredo").join(LOCAL_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.recursion_limit, 50);
        assert!(config.enable_planning);
        assert!(config.working_dir.is_none());
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "model = \"local-model\"\nrecursion_limit = 10\n").unwrap();
        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model, "local-model");
        assert_eq!(config.recursion_limit, 10);
        // Untouched fields keep their defaults.
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
    }
}
