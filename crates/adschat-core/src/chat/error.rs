//! Exchange error types

use thiserror::Error;

use crate::providers::ProviderError;

/// Why an exchange ended without a normal answer
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The completion call failed (HTTP status, network, timeout, bad body)
    #[error(transparent)]
    Completion(ProviderError),

    /// The model answered with neither text nor tool calls
    #[error(transparent)]
    EmptyResponse(ProviderError),

    /// The model asked for tools again after receiving tool results
    #[error("Model requested {count} more tool call(s) after receiving tool results; only one tool round is allowed per exchange")]
    ProtocolViolation {
        count: usize,
        /// Text the model sent alongside the extra calls, possibly empty
        content: String,
    },
}

impl From<ProviderError> for ExchangeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::EmptyResponse { .. } => Self::EmptyResponse(err),
            other => Self::Completion(other),
        }
    }
}

impl ExchangeError {
    /// HTTP status when the completion endpoint rejected the request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Completion(e) => e.status(),
            _ => None,
        }
    }

    /// Text to show the user for this failure
    ///
    /// A protocol violation still carries whatever the model wrote; every
    /// other failure, or a violation with no text, is reported by its
    /// diagnostic.
    pub fn reply_text(&self) -> String {
        match self {
            Self::ProtocolViolation { content, .. } if !content.is_empty() => content.clone(),
            other => other.to_string(),
        }
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_provider_errors() {
        let err: ExchangeError = ProviderError::empty_response("Z.ai", "no choices").into();
        assert!(matches!(err, ExchangeError::EmptyResponse(_)));

        let err: ExchangeError = ProviderError::transport("Z.ai", 503, "busy").into();
        assert!(matches!(err, ExchangeError::Completion(_)));
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Error from Z.ai API: HTTP 503");
        assert_eq!(err.reply_text(), err.to_string());
    }

    #[test]
    fn test_protocol_violation_keeps_content() {
        let err = ExchangeError::ProtocolViolation {
            count: 2,
            content: "partial".to_string(),
        };
        assert_eq!(err.reply_text(), "partial");
        assert!(err.to_string().contains("2 more tool call(s)"));
    }

    #[test]
    fn test_protocol_violation_without_text_reports_diagnostic() {
        let err = ExchangeError::ProtocolViolation {
            count: 1,
            content: String::new(),
        };
        assert_eq!(err.reply_text(), err.to_string());
        assert!(err.reply_text().contains("only one tool round"));
    }
}
