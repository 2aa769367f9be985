//! Completion client error types

use thiserror::Error;

/// Errors that can occur during a completion call
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Missing API key
    #[error("API key is required for {provider}")]
    MissingApiKey { provider: String },

    /// Non-2xx HTTP status; never retried
    #[error("Error from {provider} API: HTTP {status}")]
    Transport {
        provider: String,
        status: u16,
        message: String,
    },

    /// The model returned neither content nor tool calls
    #[error("No content or tool calls in {provider} response ({reason})")]
    EmptyResponse { provider: String, reason: String },

    /// The call did not finish within the configured timeout
    #[error("{provider} request timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    /// Network/HTTP error
    #[error("Error communicating with {provider}: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body could not be decoded
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
}

impl ProviderError {
    /// Create a transport error
    pub fn transport(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create an empty response error
    pub fn empty_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EmptyResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// HTTP status for transport errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_names_status() {
        let err = ProviderError::transport("Z.ai", 500, "internal error");
        assert_eq!(err.to_string(), "Error from Z.ai API: HTTP 500");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_empty_response_message() {
        let err = ProviderError::empty_response("Z.ai", "no choices");
        assert!(err.to_string().contains("no choices"));
        assert_eq!(err.status(), None);
    }
}
