//! Error types for drishti-fusion

use thiserror::Error;

/// Drishti-fusion error type
#[derive(Error, Debug)]
pub enum FusionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Map query failed: {0}")]
    Query(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for FusionError {
    fn from(e: toml::de::Error) -> Self {
        FusionError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FusionError>;
