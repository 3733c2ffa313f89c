//! Error types for the Glean provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Glean provider errors
#[derive(Error, Debug)]
pub enum GleanError {
    /// Token rejected or acting user not permitted
    #[error("Authentication failed (status {status_code}): {message}")]
    AuthenticationFailed { status_code: u16, message: String },

    /// API request returned an error
    #[error("Glean API error on {endpoint} (status {status_code}): {message}")]
    ApiError {
        endpoint: String,
        status_code: u16,
        message: String,
    },

    /// Failed to parse API response
    #[error("Failed to parse {endpoint} response: {message}")]
    ParseError { endpoint: String, message: String },

    /// Transport error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for Glean operations
pub type Result<T> = std::result::Result<T, GleanError>;

impl From<GleanError> for BridgeError {
    fn from(error: GleanError) -> Self {
        match error {
            GleanError::AuthenticationFailed {
                status_code,
                message,
            } => BridgeError::Api {
                status: status_code,
                message: format!("Authentication failed: {}", message),
            },
            GleanError::ApiError {
                endpoint,
                status_code,
                message,
            } => BridgeError::Api {
                status: status_code,
                message: format!("{}: {}", endpoint, message),
            },
            GleanError::ParseError { endpoint, message } => {
                BridgeError::Decode(format!("{}: {}", endpoint, message))
            }
            GleanError::BridgeError(e) => e,
        }
    }
}
