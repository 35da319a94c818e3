// Backend client error types
use crate::models::{ErrorBody, ValidationError};
use thiserror::Error;

/// Every failure the backend client can surface.
///
/// All callers see one of these; the `Display` text is what the console shows
/// to the operator.
#[derive(Error, Debug)]
pub enum ClientError {
    // Backend answered with a non-2xx status
    #[error("{message}")]
    Server { status: u16, message: String },

    // Request went out but no response came back
    #[error("Backend service is not responding. Please ensure the backend server is running on {address}")]
    Unreachable { address: String },

    // Any other transport failure
    #[error("Network error occurred")]
    Network(#[source] reqwest::Error),

    // 2xx with a body that does not match the expected schema
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Unwrap the `{detail}` body of a failed response, falling back to the status code
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message())
            .unwrap_or_else(|| format!("Server error: {}", status));

        ClientError::Server { status, message }
    }

    pub fn unreachable(address: impl Into<String>) -> Self {
        ClientError::Unreachable {
            address: address.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable { .. })
    }

    /// Short machine-friendly code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::Unreachable { .. } => "SERVICE_UNREACHABLE",
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}
