use std::time::Duration;
use thiserror::Error;

/// Failures reported by an upload gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("submission {0} not found")]
    NotFound(String),
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid response from backend: {0}")]
    InvalidResponse(String),
    #[error("operation '{operation}' timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },
    #[error("backend configuration error: {0}")]
    Config(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// `Timeout` for `operation` after `limit`, saturating absurdly long limits
    pub fn timeout(operation: &str, limit: Duration) -> Self {
        GatewayError::Timeout {
            operation: operation.to_string(),
            duration_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            GatewayError::NotFound(_) => true,
            GatewayError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::InvalidResponse(err.to_string())
    }
}
