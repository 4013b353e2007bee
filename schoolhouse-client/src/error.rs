//! Error types for the client.
//!
//! Queries surface these through the cache snapshot's `error` field;
//! mutations surface them through the returned `Result` and a notification.
//! They are recovered at the UI boundary and never crash the process.

use crate::config::ConfigError;
use schoolhouse_core::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request failed before a response arrived.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx response, message decoded from the error body when present.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
    /// Client-side form check; blocks submission, never sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Body did not match the wire contract.
    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Short text suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Network error, please try again".to_string(),
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Validation(err) => err.to_string(),
            ClientError::Decode(_) => "Unexpected response from server".to_string(),
            ClientError::Config(err) => err.to_string(),
        }
    }
}
