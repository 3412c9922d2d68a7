//! GoalBreaker configuration types and loading
//!
//! Values come from a YAML file (explicit path, project-local, or user config
//! dir) and are then overridden once by `GEMINI_*` environment variables.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Built-in model priority, highest first
pub const DEFAULT_MODEL_CHAIN: &[&str] = &[
    "gemini-3-pro-latest",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
];

/// Main GoalBreaker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model client configuration
    pub llm: LlmConfig,

    /// Retry policy for rate-limited calls
    pub retry: RetryConfig,

    /// Memoization capacities
    pub cache: CacheConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,

    /// Recent-goal history
    pub history: HistoryConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain, then apply env overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file_chain(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .goalbreaker.yml
        let local_config = PathBuf::from(".goalbreaker.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/goalbreaker/goalbreaker.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("goalbreaker").join("goalbreaker.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply `GEMINI_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("apply_overrides_from: called");
        if let Some(v) = parse_override::<f32>(&lookup, "GEMINI_TEMPERATURE") {
            self.llm.temperature = v;
        }
        if let Some(v) = parse_override::<u32>(&lookup, "GEMINI_MAX_OUTPUT_TOKENS") {
            self.llm.max_output_tokens = v;
        }
        if let Some(v) = parse_override::<u32>(&lookup, "GEMINI_MAX_RETRIES") {
            self.retry.max_attempts = v;
        }
        if let Some(secs) = parse_override::<f64>(&lookup, "GEMINI_RETRY_BASE_DELAY") {
            if secs.is_finite() && secs >= 0.0 {
                self.retry.base_delay_ms = (secs * 1000.0).round() as u64;
            } else {
                warn!(%secs, "Ignoring negative GEMINI_RETRY_BASE_DELAY");
            }
        }
        if let Some(raw) = lookup("GEMINI_MODEL_CHAIN") {
            let chain: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
            if chain.is_empty() {
                debug!("apply_overrides_from: GEMINI_MODEL_CHAIN has no entries, keeping configured chain");
            } else {
                self.llm.model_chain = chain;
            }
        }
        if let Some(model) = lookup("GEMINI_GUARDRAIL_MODEL").filter(|m| !m.trim().is_empty()) {
            self.llm.guardrail_model = model.trim().to_string();
        }
    }
}

fn parse_override<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => {
            debug!(%key, %raw, "parse_override: applied");
            Some(v)
        }
        Err(_) => {
            warn!(%key, %raw, "Ignoring unparseable override");
            None
        }
    }
}

/// Model client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature for plan generation
    pub temperature: f32,

    /// Maximum output tokens for plan generation
    #[serde(rename = "max-output-tokens")]
    pub max_output_tokens: u32,

    /// Candidate models, highest priority first
    #[serde(rename = "model-chain")]
    pub model_chain: Vec<String>,

    /// Lightweight model used by the guardrail classifier
    #[serde(rename = "guardrail-model")]
    pub guardrail_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_ms: 30_000,
            temperature: 0.1,
            max_output_tokens: 512,
            model_chain: DEFAULT_MODEL_CHAIN.iter().map(|m| m.to_string()).collect(),
            guardrail_model: "gemini-2.0-flash-lite".to_string(),
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured env var; blank counts as unset
    pub fn get_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Retry policy for rate-limited model calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum attempts per model (including the first)
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds, doubled per attempt
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Memoization capacities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(rename = "breakdown-capacity")]
    pub breakdown_capacity: usize,

    #[serde(rename = "sub-breakdown-capacity")]
    pub sub_breakdown_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            breakdown_capacity: 256,
            sub_breakdown_capacity: 512,
        }
    }
}

/// Prompt template overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `{name}.pmt` before the embedded templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Recent-goal history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// JSON-lines file holding recent plans
    pub path: PathBuf,

    /// Number of plans kept
    #[serde(rename = "max-entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/goalbreaker on Linux)
        let path = dirs::data_dir()
            .map(|d| d.join("goalbreaker"))
            .unwrap_or_else(|| PathBuf::from(".goalbreaker"))
            .join("history.jsonl");

        Self { path, max_entries: 15 }
    }
}
