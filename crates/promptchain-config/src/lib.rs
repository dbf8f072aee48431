//! Configuration management for promptchain
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. The config file is `promptchain.toml` in the
//! working directory, with `[llm]` and `[chains]` sections:
//!
//! ```toml
//! [llm]
//! provider = "anthropic"
//!
//! [llm.anthropic]
//! model = "claude-3-5-haiku-latest"
//! api_key_env = "ANTHROPIC_API_KEY"
//!
//! [chains]
//! output_dir = "out"
//! timeout_secs = 120
//! ```
//!
//! API keys are never stored in the file; each provider section names the
//! environment variable holding its key, resolved once at backend
//! construction.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use promptchain_utils::error::ConfigError;

/// Default config file name, discovered in the working directory.
pub const CONFIG_FILE_NAME: &str = "promptchain.toml";

/// Default per-invocation timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default directory for stored artifacts.
const DEFAULT_OUTPUT_DIR: &str = "out";

/// Default sentinel ending the human-in-the-loop chain.
const DEFAULT_SENTINEL: &str = "done";

/// Values supplied on the command line that override file values.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit path to a config file (skips discovery)
    pub config_path: Option<Utf8PathBuf>,
    /// Provider name (`anthropic` or `gemini`)
    pub provider: Option<String>,
    /// Model override for the selected provider
    pub model: Option<String>,
    /// Artifact output directory
    pub output_dir: Option<Utf8PathBuf>,
}

/// Effective configuration after discovery and override application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chains: ChainsConfig,
}

/// `[llm]` section: provider selection plus per-provider tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Provider to use (`anthropic` or `gemini`)
    pub provider: Option<String>,
    pub anthropic: Option<ProviderConfig>,
    pub gemini: Option<ProviderConfig>,
}

/// Per-provider settings. The API key itself lives in the environment
/// variable named by `api_key_env`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Model identifier sent to the provider
    pub model: Option<String>,
    /// Custom API base URL
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// `[chains]` section: defaults shared by the chain patterns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainsConfig {
    /// Directory artifacts are written into
    pub output_dir: Option<Utf8PathBuf>,
    /// Per-invocation timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Sentinel token ending the human-in-the-loop chain
    pub sentinel: Option<String>,
}

impl Config {
    /// Discover and load configuration, applying CLI overrides.
    ///
    /// Looks for `promptchain.toml` in the working directory unless an
    /// explicit path is given. A missing file is not an error; defaults
    /// apply. An unreadable or malformed file is.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicitly named file is missing, or if
    /// any discovered file cannot be read or parsed.
    pub fn discover(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match &overrides.config_path {
            Some(path) => Self::load_file(path)?,
            None => {
                let default = Utf8PathBuf::from(CONFIG_FILE_NAME);
                if default.exists() {
                    Self::load_file(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if it is not valid TOML for this schema.
    pub fn load_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(provider) = &overrides.provider {
            self.llm.provider = Some(provider.clone());
        }
        if let Some(model) = &overrides.model {
            let section = match self.provider() {
                "gemini" => self.llm.gemini.get_or_insert_with(ProviderConfig::default),
                _ => self
                    .llm
                    .anthropic
                    .get_or_insert_with(ProviderConfig::default),
            };
            section.model = Some(model.clone());
        }
        if let Some(dir) = &overrides.output_dir {
            self.chains.output_dir = Some(dir.clone());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.provider() {
            "anthropic" | "gemini" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "llm.provider".to_string(),
                    value: format!("unknown provider '{other}', expected 'anthropic' or 'gemini'"),
                });
            }
        }
        if let Some(0) = self.chains.timeout_secs {
            return Err(ConfigError::InvalidValue {
                key: "chains.timeout_secs".to_string(),
                value: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Effective provider name (default: `anthropic`).
    #[must_use]
    pub fn provider(&self) -> &str {
        self.llm.provider.as_deref().unwrap_or("anthropic")
    }

    /// Effective per-invocation timeout.
    #[must_use]
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.chains.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Effective artifact output directory.
    #[must_use]
    pub fn output_dir(&self) -> Utf8PathBuf {
        self.chains
            .output_dir
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Effective sentinel for the human-in-the-loop chain.
    #[must_use]
    pub fn sentinel(&self) -> &str {
        self.chains.sentinel.as_deref().unwrap_or(DEFAULT_SENTINEL)
    }
}
