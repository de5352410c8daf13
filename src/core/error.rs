//! Error types for quote fetching and ledger mutations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while fetching quotes from a provider.
///
/// Only [`FetchError::Transient`] is retried. Everything else either moves on
/// to the fallback provider or is reported to the caller as "no fresh data".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Timeouts, connection failures and 502/503/504 responses.
    #[error("Transient error from {provider}: {message}")]
    Transient { provider: String, message: String },

    /// Client errors, unexpected statuses and malformed payloads.
    #[error("Permanent error from {provider}: {message}")]
    Permanent { provider: String, message: String },

    /// Both the primary and the fallback provider failed.
    #[error("No quote provider available (primary: {primary}; fallback: {secondary})")]
    Unavailable { primary: String, secondary: String },
}

impl FetchError {
    pub fn transient(provider: &str, message: impl Into<String>) -> Self {
        FetchError::Transient {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn permanent(provider: &str, message: impl Into<String>) -> Self {
        FetchError::Permanent {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }
}

/// Validation errors for ledger mutations. State is never modified when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Deposit name must not be empty")]
    InvalidName,

    #[error("No deposit at position {index} (ledger has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        let err = FetchError::transient("dolarapi", "HTTP 503 Service Unavailable");
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "Transient error from dolarapi: HTTP 503 Service Unavailable"
        );

        let err = FetchError::permanent("criptoya", "bad payload");
        assert!(!err.is_transient());

        let err = FetchError::Unavailable {
            primary: "down".to_string(),
            secondary: "also down".to_string(),
        };
        assert!(!err.is_transient());
        assert!(err.to_string().contains("primary: down"));
    }
}
