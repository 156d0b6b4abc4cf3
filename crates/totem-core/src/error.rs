use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling [`crate::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("could not load env file {}: {reason}", path.display())]
    EnvFile { path: PathBuf, reason: String },
}
