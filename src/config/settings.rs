//! Application settings and configuration management

use crate::error::{AppError, Result};
use crate::planner::{MAX_SHOTS, MIN_SHOTS};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub planner: PlannerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub annotate: AnnotateConfig,
    pub retention: RetentionConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum request body size for uploads, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_mb() -> usize {
    25
}

/// Job workspace storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory holding one sub-directory per job
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// Prefix of returned file URLs; also where the root is served
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_storage_path() -> String {
    "./outputs".to_string()
}

fn default_url_prefix() -> String {
    "/outputs".to_string()
}

fn default_jpeg_quality() -> u8 {
    92
}

/// Request defaults for the planner
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    #[serde(default = "default_shots")]
    pub default_shots: u32,
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_shots() -> u32 {
    3
}

fn default_language() -> String {
    "fa".to_string()
}

/// External text-generation service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OpenAI-compatible base URL, e.g. `https://api.openai.com/v1`
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout() -> u64 {
    20000
}

fn default_temperature() -> f32 {
    0.4
}

/// Overlay rendering configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnnotateConfig {
    /// TTF/OTF font used for overlay text; system fonts then the bundled font are used when unset
    #[serde(default)]
    pub font_path: Option<String>,
}

/// Workspace retention configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    /// Maximum workspace age in seconds; 0 keeps workspaces forever
    #[serde(default)]
    pub max_age_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_sweep_interval() -> u64 {
    3600
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", 8080)?
            .set_default("storage.base_path", default_storage_path())?
            .set_default("planner.default_shots", 3)?
            .set_default("llm.enabled", false)?
            .set_default("retention.max_age_secs", 0)?
            .set_default("logging.level", default_log_level())?
            // Load from configuration file
            .add_source(File::with_name(path.as_ref().to_str().unwrap_or("config/default")).required(false))
            // Override with environment variables (prefixed with STORYBOARD_)
            .add_source(
                Environment::with_prefix("STORYBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if !(1..=100).contains(&self.storage.jpeg_quality) {
            return Err(invalid(format!(
                "storage.jpeg_quality must be within 1..=100, got {}",
                self.storage.jpeg_quality
            )));
        }

        if self.storage.url_prefix.trim_matches('/').is_empty() {
            return Err(invalid("storage.url_prefix cannot be empty"));
        }

        if !(MIN_SHOTS..=MAX_SHOTS).contains(&self.planner.default_shots) {
            return Err(invalid(format!(
                "planner.default_shots must be within {}..={}",
                MIN_SHOTS, MAX_SHOTS
            )));
        }

        if self.llm.enabled {
            if self.llm.endpoint.trim().is_empty() {
                return Err(invalid("llm.endpoint is required when llm.enabled is true"));
            }
            if self.llm.model.trim().is_empty() {
                return Err(invalid("llm.model is required when llm.enabled is true"));
            }
            if self.llm.timeout_ms == 0 {
                return Err(invalid("llm.timeout_ms must be greater than 0 when llm.enabled is true"));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_upload_mb: default_max_upload_mb(),
            },
            storage: StorageConfig {
                base_path: default_storage_path(),
                url_prefix: default_url_prefix(),
                jpeg_quality: default_jpeg_quality(),
            },
            planner: PlannerConfig {
                default_shots: default_shots(),
                default_language: default_language(),
            },
            llm: LlmConfig {
                enabled: false,
                endpoint: default_llm_endpoint(),
                model: default_llm_model(),
                api_key: None,
                timeout_ms: default_llm_timeout(),
                temperature: default_temperature(),
            },
            annotate: AnnotateConfig::default(),
            retention: RetentionConfig {
                max_age_secs: 0,
                sweep_interval_secs: default_sweep_interval(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
