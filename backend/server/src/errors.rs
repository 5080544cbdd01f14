//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Calculation rejected: {0}")]
    Engine(#[from] share_engine::EngineError),

    #[error("Request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ServerError>;
