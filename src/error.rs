use thiserror::Error;

/// Failures while setting the application up. Everything past start-up
/// degrades to a fallback instead of erroring.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("could not initialise logging: {0}")]
    Logging(String),

    #[error("audio unavailable: {0}")]
    Audio(String),
}
