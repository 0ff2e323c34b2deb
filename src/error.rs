//! Wallet operation errors
//!
//! One variant per failure kind so callers can branch on what failed
//! instead of matching message text. Every variant that wraps an exchange
//! failure keeps it as the error `source`.

use thiserror::Error;

use crate::exchange::ExchangeError;

/// Which history listing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Deposits,
    Withdrawals,
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryKind::Deposits => write!(f, "deposit"),
            HistoryKind::Withdrawals => write!(f, "withdrawal"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WalletError {
    /// Credentials missing; the user has to fix the environment
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to initialize exchange client: {0}")]
    ClientInitialization(#[source] ExchangeError),

    #[error("Failed to fetch balance: {0}")]
    BalanceFetch(#[source] ExchangeError),

    #[error("Withdrawal failed: {0}")]
    Withdrawal(#[source] ExchangeError),

    #[error("Failed to fetch deposit address: {0}")]
    DepositAddress(#[source] ExchangeError),

    #[error("Failed to fetch {kind} history: {source}")]
    HistoryFetch {
        kind: HistoryKind,
        #[source]
        source: ExchangeError,
    },
}

impl WalletError {
    /// Underlying exchange failure, if any.
    pub fn exchange_error(&self) -> Option<&ExchangeError> {
        match self {
            Self::Configuration(_) => None,
            Self::ClientInitialization(e)
            | Self::BalanceFetch(e)
            | Self::Withdrawal(e)
            | Self::DepositAddress(e) => Some(e),
            Self::HistoryFetch { source, .. } => Some(source),
        }
    }

    /// True when the cause is transient (network, throttling, 5xx).
    pub fn is_retryable(&self) -> bool {
        self.exchange_error()
            .map(ExchangeError::is_transient)
            .unwrap_or(false)
    }
}

pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages_carry_operation_prefix() {
        let err = WalletError::Withdrawal(ExchangeError::Client("connection reset".into()));
        assert_eq!(err.to_string(), "Withdrawal failed: connection reset");

        let err = WalletError::HistoryFetch {
            kind: HistoryKind::Deposits,
            source: ExchangeError::Client("timeout".into()),
        };
        assert_eq!(err.to_string(), "Failed to fetch deposit history: timeout");

        let err = WalletError::HistoryFetch {
            kind: HistoryKind::Withdrawals,
            source: ExchangeError::Client("timeout".into()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch withdrawal history: timeout"
        );
    }

    #[test]
    fn test_source_is_preserved() {
        let err = WalletError::BalanceFetch(ExchangeError::NotSupported("sapi".into()));
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "not supported: sapi");
        assert!(matches!(
            err.exchange_error(),
            Some(ExchangeError::NotSupported(_))
        ));
    }

    #[test]
    fn test_configuration_is_never_retryable() {
        let err = WalletError::Configuration("missing key".into());
        assert!(!err.is_retryable());
        assert!(err.exchange_error().is_none());

        let err = WalletError::DepositAddress(ExchangeError::Http {
            status: 503,
            body: "unavailable".into(),
        });
        assert!(err.is_retryable());
    }
}
