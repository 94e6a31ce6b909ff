//! Configuration loading, validation, and management for barrister.
//!
//! Loads configuration from `~/.barrister/config.toml` with environment
//! variable overrides. Validates all settings at load. A missing API key is
//! not a load error — the CLI treats it as a fatal startup condition with
//! setup instructions, via [`AppConfig::require_api_key`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.barrister/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API credential for the model endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model to request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retry/backoff policy for the resilient invoker.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Context character budgets.
    #[serde(default)]
    pub context: ContextConfig,

    /// Retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "deepseek-r1-distill-llama-70b".into()
}
fn default_temperature() -> f32 {
    0.0
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("retry", &self.retry)
            .field("context", &self.context)
            .field("retrieval", &self.retrieval)
            .field("report", &self.report)
            .finish()
    }
}

/// Retry/backoff settings for the resilient invoker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in seconds.
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: f64,

    /// Backoff delay cap in seconds.
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,
}

fn default_max_retries() -> u32 {
    3
}
fn default_base_delay_secs() -> f64 {
    1.0
}
fn default_max_delay_secs() -> f64 {
    10.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_secs: default_base_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

/// Context character budgets for the two services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Budget when answering a question.
    #[serde(default = "default_answer_max_chars")]
    pub answer_max_chars: usize,

    /// Budget when summarizing (smaller, to be extra safe).
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
}

fn default_answer_max_chars() -> usize {
    16_000
}
fn default_summary_max_chars() -> usize {
    12_000
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            answer_max_chars: default_answer_max_chars(),
            summary_max_chars: default_summary_max_chars(),
        }
    }
}

/// Settings for the file-backed fragment source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory documents are resolved against.
    #[serde(default = "default_document_root")]
    pub document_root: String,

    /// Maximum fragments returned per query.
    #[serde(default = "default_retrieval_limit")]
    pub limit: usize,
}

fn default_document_root() -> String {
    ".".into()
}
fn default_retrieval_limit() -> usize {
    8
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            document_root: default_document_root(),
            limit: default_retrieval_limit(),
        }
    }
}

/// Settings for report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory the report PDF is written to.
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
}

fn default_report_dir() -> String {
    ".".into()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.barrister/config.toml).
    ///
    /// Environment variable overrides:
    /// - `BARRISTER_API_KEY` (highest priority), then `GROQ_API_KEY`
    /// - `BARRISTER_API_URL`
    /// - `BARRISTER_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides. Env values win over file
    /// values; the file is the fallback.
    fn apply_env_overrides(&mut self) {
        self.api_key = std::env::var("BARRISTER_API_KEY")
            .ok()
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .or_else(|| self.api_key.take());

        if let Ok(url) = std::env::var("BARRISTER_API_URL") {
            self.api_url = url;
        }

        if let Ok(model) = std::env::var("BARRISTER_MODEL") {
            self.model = model;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".barrister")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.retry.base_delay_secs <= 0.0 {
            return Err(ConfigError::ValidationError(
                "retry.base_delay_secs must be > 0".into(),
            ));
        }

        if self.retry.max_delay_secs < self.retry.base_delay_secs {
            return Err(ConfigError::ValidationError(
                "retry.max_delay_secs must be >= retry.base_delay_secs".into(),
            ));
        }

        if self.context.answer_max_chars == 0 || self.context.summary_max_chars == 0 {
            return Err(ConfigError::ValidationError(
                "context budgets must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The API key, or a fatal configuration error with setup instructions.
    ///
    /// The model endpoint cannot be reached without a credential, so callers
    /// check this at startup.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or_else(|| {
            ConfigError::MissingApiKey {
                config_path: Self::config_dir().join("config.toml"),
            }
        })
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            retry: RetryConfig::default(),
            context: ContextConfig::default(),
            retrieval: RetrievalConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error(
        "No API key configured. Set BARRISTER_API_KEY or GROQ_API_KEY, or add api_key to {config_path}"
    )]
    MissingApiKey { config_path: PathBuf },
}
