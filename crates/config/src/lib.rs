pub mod models;
pub mod validation;

// Re-export commonly used types
pub use models::{
    AppConfig, ConfigOverrides, LogFormat, LogLevel, ObservabilityConfig, OutputConfig,
    PipelineConfig, QrsConfig,
};
pub use validation::{ConfigValidator, ValidationUtils};

/// Configuration error type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error enumeration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}
