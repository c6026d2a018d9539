//! Instagram error types.

use thiserror::Error;

pub type InstagramResult<T> = Result<T, InstagramError>;

#[derive(Debug, Error)]
pub enum InstagramError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Graph API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InstagramError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn account_not_found(account_id: impl Into<String>) -> Self {
        Self::AccountNotFound(account_id.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map a non-success Graph API status to an error.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Unauthorized { status, body },
            429 => Self::RateLimited(body),
            _ => Self::Api { status, body },
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            InstagramError::Network(_) | InstagramError::RateLimited(_) => true,
            InstagramError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert!(matches!(
            InstagramError::from_http_status(401, "bad token"),
            InstagramError::Unauthorized { status: 401, .. }
        ));
        assert!(matches!(
            InstagramError::from_http_status(429, "slow down"),
            InstagramError::RateLimited(_)
        ));
        assert!(matches!(
            InstagramError::from_http_status(400, "bad media"),
            InstagramError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_is_retryable() {
        assert!(InstagramError::from_http_status(429, "").is_retryable());
        assert!(InstagramError::from_http_status(503, "").is_retryable());
        assert!(!InstagramError::from_http_status(400, "").is_retryable());
        assert!(!InstagramError::from_http_status(403, "").is_retryable());
        assert!(!InstagramError::account_not_found("test1").is_retryable());
    }
}
