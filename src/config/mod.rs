//! Configuration module

pub mod settings;

pub use settings::{
    AnnotateConfig, LlmConfig, LoggingConfig, PlannerConfig, RetentionConfig, ServerConfig,
    Settings, StorageConfig,
};
