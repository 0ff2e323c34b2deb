//! Exchange-level error types

use thiserror::Error;

/// Failures raised by an [`ExchangeClient`](super::ExchangeClient).
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Transport failure (DNS, TLS, connect, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status without a recognizable exchange error body
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Exchange rejected the request with its own error code
    #[error("binance {status} {code}: {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Catch-all for client implementations that are not HTTP based
    #[error("{0}")]
    Client(String),
}

impl ExchangeError {
    /// Whether repeating the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } | Self::Api { status, .. } => {
                *status == 429 || *status == 418 || *status >= 500
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let throttled = ExchangeError::Api {
            status: 429,
            code: -1003,
            message: "Too many requests".into(),
        };
        assert!(throttled.is_transient());

        let gateway = ExchangeError::Http {
            status: 502,
            body: "Bad Gateway".into(),
        };
        assert!(gateway.is_transient());

        let rejected = ExchangeError::Api {
            status: 400,
            code: -4026,
            message: "Withdrawal amount must be positive".into(),
        };
        assert!(!rejected.is_transient());
        assert!(!ExchangeError::NotSupported("sapi".into()).is_transient());
    }

    #[test]
    fn test_api_error_display() {
        let err = ExchangeError::Api {
            status: 401,
            code: -2015,
            message: "Invalid API-key, IP, or permissions for action.".into(),
        };
        assert_eq!(
            err.to_string(),
            "binance 401 -2015: Invalid API-key, IP, or permissions for action."
        );
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: ExchangeError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, ExchangeError::Parse(_)));
    }
}
