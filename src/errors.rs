use thiserror::Error;

/// Errors raised while bridging a form to the backend.
///
/// Messages are safe to surface: none of the variants carry credentials or
/// token material.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Missing element: #{0}")]
    MissingElement(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
