//! Error types for the completion gateway.
//!
//! Backends return [`LlmError`] directly; callers wrap it in a rootcause
//! `Report` (see `cartwise_core::Result`) as it propagates.

use std::fmt;

/// Errors from LLM backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Provider is not configured or cannot be reached at all.
    ProviderUnavailable { provider: String, reason: String },
    /// The request never produced an HTTP response.
    RequestFailed { reason: String },
    /// The provider answered with a non-success status and an error body.
    ProviderRejected { status: u16, body: String },
    /// Response parsing failed.
    ResponseParseFailed { reason: String },
    /// Timeout waiting for response.
    Timeout,
    /// Rate limit exceeded.
    RateLimited { retry_after_secs: Option<u64> },
    /// Invalid configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderUnavailable { provider, reason } => {
                write!(f, "LLM provider '{provider}' unavailable: {reason}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "LLM request failed: {reason}")
            }
            Self::ProviderRejected { status, body } => {
                write!(f, "LLM provider returned HTTP {status}: {body}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse LLM response: {reason}")
            }
            Self::Timeout => write!(f, "LLM request timed out"),
            Self::RateLimited { retry_after_secs } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "rate limited, retry after {secs}s")
                } else {
                    write!(f, "rate limited")
                }
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid LLM configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_rejected_display_includes_body() {
        let err = LlmError::ProviderRejected {
            status: 401,
            body: r#"{"error":{"message":"Bad credentials"}}"#.to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("401"));
        assert!(display.contains("Bad credentials"));
    }

    #[test]
    fn rate_limited_display() {
        let with_hint = LlmError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert_eq!(with_hint.to_string(), "rate limited, retry after 30s");
        let without = LlmError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(without.to_string(), "rate limited");
    }

    #[test]
    fn provider_unavailable_display() {
        let err = LlmError::ProviderUnavailable {
            provider: "hugging_face".to_string(),
            reason: "no token configured".to_string(),
        };
        assert!(err.to_string().contains("hugging_face"));
        assert!(err.to_string().contains("no token configured"));
    }
}
