use thiserror::Error;

/// Top-level error type for the relay process.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::app::ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] crate::app::InitializationError),

    #[error("Service error: {0}")]
    Service(#[from] crate::app::ServiceError),
}
