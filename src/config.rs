//! Configuration management
//!
//! Resolves API credentials, routing flags and pass-through client settings
//! from environment variables. Resolution never fails: missing credentials
//! are reported by [`Settings::is_valid`] and rejected when the wallet
//! manager is constructed.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::common::RateLimiterConfig;

pub const ENV_API_KEY: &str = "BINANCE_API_KEY";
pub const ENV_API_SECRET: &str = "BINANCE_API_SECRET";
pub const ENV_TESTNET: &str = "BINANCE_TESTNET";
pub const ENV_SANDBOX: &str = "BINANCE_SANDBOX";

pub const ENV_API_URL: &str = "BINANCE_API_URL";
pub const ENV_SAPI_URL: &str = "BINANCE_SAPI_URL";
pub const ENV_TESTNET_URL: &str = "BINANCE_TESTNET_URL";
pub const ENV_TIMEOUT_SECS: &str = "BINANCE_TIMEOUT_SECS";
pub const ENV_RECV_WINDOW: &str = "BINANCE_RECV_WINDOW";
pub const ENV_ENABLE_RATE_LIMIT: &str = "BINANCE_ENABLE_RATE_LIMIT";
pub const ENV_RATE_LIMIT: &str = "BINANCE_RATE_LIMIT";

pub const DEFAULT_API_URL: &str = "https://api.binance.com/api";
pub const DEFAULT_SAPI_URL: &str = "https://api.binance.com/sapi";
pub const DEFAULT_TESTNET_URL: &str = "https://testnet.binance.vision/api";

const MASK: &str = "**********";

/// API key and secret handed to the exchange client.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(rename = "apiKey")]
    api_key: String,
    #[serde(rename = "secret")]
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &MASK)
            .finish()
    }
}

/// Settings passed straight through to the exchange client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Production spot REST base (`.../api`)
    pub api_url: String,
    /// Production wallet REST base (`.../sapi`)
    pub sapi_url: String,
    /// Testnet spot REST base
    pub testnet_url: String,
    /// Request timeout duration
    pub timeout: Duration,
    /// `recvWindow` sent with signed requests, in milliseconds
    pub recv_window: u64,
    /// Client-side throttling before each request
    pub enable_rate_limit: bool,
    pub rate_limiter: RateLimiterConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            sapi_url: DEFAULT_SAPI_URL.to_string(),
            testnet_url: DEFAULT_TESTNET_URL.to_string(),
            timeout: Duration::from_secs(30),
            recv_window: 5000,
            enable_rate_limit: true,
            rate_limiter: RateLimiterConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_sapi_url(mut self, url: impl Into<String>) -> Self {
        self.sapi_url = url.into();
        self
    }

    pub fn with_testnet_url(mut self, url: impl Into<String>) -> Self {
        self.testnet_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    /// Set rate limit (requests per second)
    pub fn with_rate_limit(mut self, requests_per_second: usize) -> Self {
        self.rate_limiter = self.rate_limiter.with_rate(requests_per_second);
        self
    }

    pub fn with_rate_limiting(mut self, enabled: bool) -> Self {
        self.enable_rate_limit = enabled;
        self
    }

    fn resolve_from<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup(ENV_API_URL)) {
            config = config.with_api_url(trim_url(url));
        }
        if let Some(url) = non_empty(lookup(ENV_SAPI_URL)) {
            config = config.with_sapi_url(trim_url(url));
        }
        if let Some(url) = non_empty(lookup(ENV_TESTNET_URL)) {
            config = config.with_testnet_url(trim_url(url));
        }
        if let Some(secs) = parse_number::<u64, _>(lookup, ENV_TIMEOUT_SECS) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(window) = parse_number::<u64, _>(lookup, ENV_RECV_WINDOW) {
            config = config.with_recv_window(window);
        }
        if let Some(raw) = lookup(ENV_ENABLE_RATE_LIMIT) {
            config = config.with_rate_limiting(parse_flag(Some(raw)));
        }
        if let Some(rate) = parse_number::<usize, _>(lookup, ENV_RATE_LIMIT) {
            config = config.with_rate_limit(rate);
        }

        config
    }
}

/// Resolved configuration for one wallet manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Route the client to the exchange testnet
    pub use_testnet: bool,
    /// Carried for display; routing is decided by `use_testnet`
    pub use_sandbox: bool,
    pub client: ClientConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            use_testnet: true,
            use_sandbox: true,
            client: ClientConfig::default(),
        }
    }
}

impl Settings {
    /// Settings with explicit credentials and default flags (testnet on).
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Self::default()
        }
    }

    /// Read settings from the process environment.
    pub fn resolve() -> Self {
        Self::resolve_from(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Flags default to `true` when unset; a set flag is `true` only when it
    /// equals `"true"` ignoring case.
    pub fn resolve_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_key: lookup(ENV_API_KEY),
            api_secret: lookup(ENV_API_SECRET),
            use_testnet: parse_flag(lookup(ENV_TESTNET)),
            use_sandbox: parse_flag(lookup(ENV_SANDBOX)),
            client: ClientConfig::resolve_from(&lookup),
        }
    }

    pub fn with_testnet(mut self, enabled: bool) -> Self {
        self.use_testnet = enabled;
        self
    }

    pub fn with_client_config(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Both credentials present and non-empty.
    pub fn is_valid(&self) -> bool {
        has_value(&self.api_key) && has_value(&self.api_secret)
    }

    /// Names of the credential variables that are missing or empty.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !has_value(&self.api_key) {
            missing.push(ENV_API_KEY);
        }
        if !has_value(&self.api_secret) {
            missing.push(ENV_API_SECRET);
        }
        missing
    }

    /// Credentials view for the exchange client; absent values are empty.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.api_key.clone().unwrap_or_default(),
            self.api_secret.clone().unwrap_or_default(),
        )
    }

    /// Human-readable summary with credentials masked.
    pub fn display(&self) -> String {
        let masked = |value: &Option<String>| {
            if has_value(value) {
                MASK
            } else {
                "NOT SET"
            }
        };
        let line = "=".repeat(50);

        let mut out = String::new();
        out.push_str(&format!("{}\n", line));
        out.push_str("Current Configuration\n");
        out.push_str(&format!("{}\n", line));
        out.push_str(&format!("Binance API Key:    {}\n", masked(&self.api_key)));
        out.push_str(&format!("Binance API Secret: {}\n", masked(&self.api_secret)));
        out.push_str(&format!("Testnet Enabled:    {}\n", self.use_testnet));
        out.push_str(&format!("Sandbox Enabled:    {}\n", self.use_sandbox));
        out.push_str(&format!("API URL:            {}\n", self.client.api_url));
        out.push_str(&format!("SAPI URL:           {}\n", self.client.sapi_url));
        out.push_str(&format!("Testnet URL:        {}\n", self.client.testnet_url));
        out.push_str(&format!(
            "Timeout:            {}s\n",
            self.client.timeout.as_secs()
        ));
        out.push_str(&format!(
            "Rate Limit:         {}\n",
            if self.client.enable_rate_limit {
                format!("{} req/s", self.client.rate_limiter.max_requests_per_second)
            } else {
                "disabled".to_string()
            }
        ));
        out.push_str(&line);
        out
    }
}

fn parse_flag(raw: Option<String>) -> bool {
    raw.map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(true)
}

fn has_value(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_number<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = non_empty(lookup(name))?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid number", name, raw);
            None
        }
    }
}
