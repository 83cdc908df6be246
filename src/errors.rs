// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("A results query is already in flight")]
    Busy,

    #[error("Request was cancelled")]
    Cancelled,
}

impl ExtractError {
    /// The request never produced a usable response: it could not be sent,
    /// or the body could not be decoded.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, ExtractError::Network(_) | ExtractError::JsonParse(_))
    }

    pub fn is_backend_rejection(&self) -> bool {
        matches!(self, ExtractError::Rejected { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
