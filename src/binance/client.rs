//! Binance REST client for wallet endpoints
//!
//! Blocking HTTP client with:
//! - HMAC-SHA256 signed requests (`timestamp` + `recvWindow`)
//! - Client-side rate limiting
//! - Sandbox routing to the spot testnet
//!
//! # Example
//!
//! ```no_run
//! use binance_wallet_manager::binance::BinanceClient;
//! use binance_wallet_manager::config::{ClientConfig, Credentials};
//! use binance_wallet_manager::exchange::ExchangeClient;
//!
//! fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::new("api_key", "api_secret");
//!     let mut client = BinanceClient::new(credentials, ClientConfig::default())?;
//!     client.set_sandbox_mode(true)?;
//!
//!     let balance = client.fetch_balance()?;
//!     println!("Assets listed: {}", balance.total.len());
//!     Ok(())
//! }
//! ```

use chrono::{Duration, Utc};
use reqwest::blocking::Client;
use reqwest::{Method, Url};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use super::auth::{sign_query, API_KEY_HEADER};
use super::parse;
use crate::common::RateLimiter;
use crate::config::{ClientConfig, Credentials};
use crate::exchange::{
    Balance, DepositAddress, ExchangeClient, ExchangeError, ExchangeResult, Params, Transaction,
    WithdrawalResponse,
};

/// Binance only serves history windows of up to 90 days per request
const HISTORY_WINDOW_DAYS: i64 = 90;

/// REST API family an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Api {
    /// `/api/v3/...` spot endpoints (available on testnet)
    Spot,
    /// `/sapi/v1/...` wallet endpoints (production only)
    Sapi,
}

/// Binance wallet API client
#[derive(Debug, Clone)]
pub struct BinanceClient {
    credentials: Credentials,
    http_client: Client,
    config: ClientConfig,
    rate_limiter: Option<RateLimiter>,
    sandbox: bool,
}

impl BinanceClient {
    /// Create a client bound to `credentials`, routed to production.
    pub fn new(credentials: Credentials, config: ClientConfig) -> ExchangeResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        let rate_limiter = config
            .enable_rate_limit
            .then(|| RateLimiter::new(config.rate_limiter.clone()));

        debug!(
            "Binance client created (timeout={}s, rate_limit={})",
            config.timeout.as_secs(),
            config.enable_rate_limit
        );

        Ok(Self {
            credentials,
            http_client,
            config,
            rate_limiter,
            sandbox: false,
        })
    }

    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check connectivity to the spot API (unsigned).
    pub fn ping(&self) -> ExchangeResult<bool> {
        let url = self.endpoint(Api::Spot, "/v3/ping")?;
        self.throttle();
        let response = self.http_client.get(url).send()?;
        Ok(response.status().is_success())
    }

    fn base_url(&self, api: Api) -> ExchangeResult<&str> {
        match (api, self.sandbox) {
            (Api::Spot, false) => Ok(&self.config.api_url),
            (Api::Spot, true) => Ok(&self.config.testnet_url),
            (Api::Sapi, false) => Ok(&self.config.sapi_url),
            (Api::Sapi, true) => Err(ExchangeError::NotSupported(
                "binance testnet does not provide sapi (wallet) endpoints".to_string(),
            )),
        }
    }

    fn endpoint(&self, api: Api, path: &str) -> ExchangeResult<Url> {
        let base = self.base_url(api)?;
        Url::parse(&format!("{}{}", base, path))
            .map_err(|e| ExchangeError::InvalidRequest(format!("bad endpoint URL: {}", e)))
    }

    fn throttle(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire();
        }
    }

    /// Send a `SIGNED` request and decode the JSON body.
    fn signed_request(
        &self,
        method: Method,
        api: Api,
        path: &str,
        params: &Params,
    ) -> ExchangeResult<Value> {
        let mut url = self.endpoint(api, path)?;
        url.query_pairs_mut()
            .extend_pairs(params.iter())
            .append_pair("recvWindow", &self.config.recv_window.to_string())
            .append_pair("timestamp", &Utc::now().timestamp_millis().to_string());

        let signature = sign_query(url.query().unwrap_or_default(), self.credentials.api_secret());
        url.query_pairs_mut().append_pair("signature", &signature);

        debug!("{} {}", method, url.path());
        self.throttle();

        let response = self
            .http_client
            .request(method, url)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(parse::error_from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Shared request shaping for the two history endpoints.
    fn history_request(
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> ExchangeResult<Params> {
        let mut request = Params::new();
        if let Some(code) = code {
            request.insert("coin".to_string(), code.to_string());
        }
        if let Some(since) = since {
            request.insert("startTime".to_string(), since.to_string());
            if !params.contains_key("endTime") {
                let end = since
                    .checked_add(Duration::days(HISTORY_WINDOW_DAYS).num_milliseconds())
                    .ok_or_else(|| {
                        ExchangeError::InvalidRequest(format!("since {} is out of range", since))
                    })?;
                request.insert("endTime".to_string(), end.to_string());
            }
        }
        if let Some(limit) = limit {
            request.insert("limit".to_string(), limit.to_string());
        }
        request.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(request)
    }

    /// Request parameters for `withdraw/apply`.
    ///
    /// `tag` and `network` are mapped first; every other caller key is
    /// applied afterwards and wins, including a raw `addressTag`.
    fn withdraw_request(
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        params: &Params,
    ) -> Params {
        let mut request = Params::new();
        request.insert("coin".to_string(), code.to_string());
        request.insert("address".to_string(), address.to_string());
        request.insert("amount".to_string(), amount.normalize().to_string());
        if let Some(tag) = tag {
            request.insert("addressTag".to_string(), tag.to_string());
        }

        if let Some(tag) = params.get("tag") {
            request.insert("addressTag".to_string(), tag.clone());
        }
        if let Some(network) = params.get("network") {
            request.insert("network".to_string(), parse::network_code_to_id(network));
        }
        request.extend(
            params
                .iter()
                .filter(|(key, _)| !matches!(key.as_str(), "tag" | "network"))
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        request
    }

    fn deposit_address_request(code: &str, params: &Params) -> Params {
        let mut request = Params::new();
        request.insert("coin".to_string(), code.to_string());
        for (key, value) in params {
            if key == "network" {
                request.insert("network".to_string(), parse::network_code_to_id(value));
            } else {
                request.insert(key.clone(), value.clone());
            }
        }
        request
    }
}

impl ExchangeClient for BinanceClient {
    fn set_sandbox_mode(&mut self, enabled: bool) -> ExchangeResult<()> {
        if enabled {
            Url::parse(&self.config.testnet_url).map_err(|e| {
                ExchangeError::InvalidRequest(format!(
                    "invalid testnet URL {:?}: {}",
                    self.config.testnet_url, e
                ))
            })?;
            info!("Sandbox mode enabled, spot API routed to {}", self.config.testnet_url);
        } else {
            info!("Sandbox mode disabled, using {}", self.config.api_url);
        }
        self.sandbox = enabled;
        Ok(())
    }

    fn fetch_balance(&self) -> ExchangeResult<Balance> {
        let info = self.signed_request(Method::GET, Api::Spot, "/v3/account", &Params::new())?;
        parse::parse_balance(info)
    }

    fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        params: &Params,
    ) -> ExchangeResult<WithdrawalResponse> {
        let request = Self::withdraw_request(code, amount, address, tag, params);
        let info = self.signed_request(
            Method::POST,
            Api::Sapi,
            "/v1/capital/withdraw/apply",
            &request,
        )?;
        Ok(parse::parse_withdrawal_response(info))
    }

    fn fetch_deposit_address(&self, code: &str, params: &Params) -> ExchangeResult<DepositAddress> {
        let request = Self::deposit_address_request(code, params);
        let info = self.signed_request(
            Method::GET,
            Api::Sapi,
            "/v1/capital/deposit/address",
            &request,
        )?;
        parse::parse_deposit_address(info, code, request.get("network").map(String::as_str))
    }

    fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> ExchangeResult<Vec<Transaction>> {
        let request = Self::history_request(code, since, limit, params)?;
        let info = self.signed_request(
            Method::GET,
            Api::Sapi,
            "/v1/capital/deposit/hisrec",
            &request,
        )?;
        let deposits = parse::parse_deposits(info)?;
        Ok(parse::filter_by_since_limit(deposits, since, limit))
    }

    fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> ExchangeResult<Vec<Transaction>> {
        let request = Self::history_request(code, since, limit, params)?;
        let info = self.signed_request(
            Method::GET,
            Api::Sapi,
            "/v1/capital/withdraw/history",
            &request,
        )?;
        let withdrawals = parse::parse_withdrawals(info)?;
        Ok(parse::filter_by_since_limit(withdrawals, since, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client() -> BinanceClient {
        BinanceClient::new(
            Credentials::new("test_key", "test_secret"),
            ClientConfig::default(),
        )
        .unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert!(!client.is_sandbox());
        assert!(client.rate_limiter.is_some());

        let client = BinanceClient::new(
            Credentials::new("k", "s"),
            ClientConfig::default().with_rate_limiting(false),
        )
        .unwrap();
        assert!(client.rate_limiter.is_none());
    }

    #[test]
    fn test_production_routing() {
        let client = client();
        assert_eq!(
            client.endpoint(Api::Spot, "/v3/account").unwrap().as_str(),
            "https://api.binance.com/api/v3/account"
        );
        assert_eq!(
            client
                .endpoint(Api::Sapi, "/v1/capital/deposit/hisrec")
                .unwrap()
                .as_str(),
            "https://api.binance.com/sapi/v1/capital/deposit/hisrec"
        );
    }

    #[test]
    fn test_sandbox_routing() {
        let mut client = client();
        client.set_sandbox_mode(true).unwrap();
        assert!(client.is_sandbox());
        assert_eq!(
            client.endpoint(Api::Spot, "/v3/account").unwrap().as_str(),
            "https://testnet.binance.vision/api/v3/account"
        );

        let err = client.endpoint(Api::Sapi, "/v1/capital/withdraw/apply").unwrap_err();
        assert!(matches!(err, ExchangeError::NotSupported(_)));

        client.set_sandbox_mode(false).unwrap();
        assert!(client.endpoint(Api::Sapi, "/v1/capital/withdraw/apply").is_ok());
    }

    #[test]
    fn test_sandbox_rejects_malformed_testnet_url() {
        let mut client = BinanceClient::new(
            Credentials::new("k", "s"),
            ClientConfig::default().with_testnet_url("not a url"),
        )
        .unwrap();
        let err = client.set_sandbox_mode(true).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidRequest(_)));
        assert!(!client.is_sandbox());
    }

    #[test]
    fn test_sapi_calls_fail_in_sandbox() {
        let mut client = client();
        client.set_sandbox_mode(true).unwrap();

        let err = client
            .fetch_deposit_address("USDT", &Params::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NotSupported(_)));

        let err = client
            .fetch_withdrawals(None, None, Some(5), &Params::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NotSupported(_)));
    }

    #[test]
    fn test_withdraw_request_shaping() {
        let request = BinanceClient::withdraw_request(
            "USDT",
            dec!(10.0),
            "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb",
            None,
            &params(&[("network", "ERC20"), ("name", "cold wallet")]),
        );
        assert_eq!(request["coin"], "USDT");
        assert_eq!(request["amount"], "10");
        assert_eq!(request["network"], "ETH");
        assert_eq!(request["name"], "cold wallet");
        assert!(!request.contains_key("addressTag"));
    }

    #[test]
    fn test_withdraw_tag_param_wins_over_argument() {
        let request = BinanceClient::withdraw_request(
            "XRP",
            dec!(25),
            "rEb8TK3gBgk5auZkwc6sHnwrGVJH8DuaLh",
            Some("111"),
            &params(&[("tag", "222")]),
        );
        assert_eq!(request["addressTag"], "222");
        assert!(!request.contains_key("tag"));
    }

    #[test]
    fn test_withdraw_raw_address_tag_extra_wins() {
        let request = BinanceClient::withdraw_request(
            "XRP",
            dec!(25),
            "rEb8TK3gBgk5auZkwc6sHnwrGVJH8DuaLh",
            Some("111"),
            &params(&[("addressTag", "333"), ("tag", "222")]),
        );
        assert_eq!(request["addressTag"], "333");
        assert!(!request.contains_key("tag"));
    }

    #[test]
    fn test_deposit_address_request() {
        let request =
            BinanceClient::deposit_address_request("USDT", &params(&[("network", "trc20")]));
        assert_eq!(request["coin"], "USDT");
        assert_eq!(request["network"], "TRX");
    }

    #[test]
    fn test_history_request_window() {
        let request =
            BinanceClient::history_request(Some("BTC"), Some(1_000), Some(5), &Params::new())
                .unwrap();
        assert_eq!(request["coin"], "BTC");
        assert_eq!(request["startTime"], "1000");
        assert_eq!(request["endTime"], (1_000 + 90 * 86_400_000i64).to_string());
        assert_eq!(request["limit"], "5");

        let request = BinanceClient::history_request(
            None,
            Some(1_000),
            None,
            &params(&[("endTime", "2000"), ("status", "1")]),
        )
        .unwrap();
        assert!(!request.contains_key("coin"));
        assert_eq!(request["endTime"], "2000");
        assert_eq!(request["status"], "1");
    }

    #[test]
    fn test_history_request_rejects_overflowing_since() {
        let err = BinanceClient::history_request(None, Some(i64::MAX - 1_000), Some(5), &Params::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidRequest(_)));

        // Caller-supplied endTime skips the window computation
        let request = BinanceClient::history_request(
            None,
            Some(i64::MAX),
            None,
            &params(&[("endTime", "1")]),
        )
        .unwrap();
        assert_eq!(request["startTime"], i64::MAX.to_string());
    }

    #[test]
    fn test_fetch_deposits_overflow_fails_before_sending() {
        let err = client()
            .fetch_deposits(None, Some(i64::MAX - 1_000), Some(5), &Params::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidRequest(_)));
    }
}
