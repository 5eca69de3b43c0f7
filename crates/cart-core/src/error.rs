//! Core error types.

use thiserror::Error;

/// Errors raised while validating widget input or configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Item identifier is empty or contains characters unsafe for a URL path.
    #[error("Invalid item id: {0:?}")]
    InvalidItemId(String),

    /// Quantity outside the accepted range.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Cart status reported success without a usable item count.
    #[error("Malformed cart summary: {0}")]
    MalformedSummary(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
