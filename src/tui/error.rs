use crate::api::ApiError;
use crate::config::ConfigError;

/// Errors that can stop the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}
