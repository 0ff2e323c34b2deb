//! Wallet manager
//!
//! Validates settings, binds an exchange client to the credentials and
//! exposes the wallet operations. Each operation builds its request
//! parameters, makes exactly one client call and reshapes the answer; any
//! client failure comes back as the matching [`WalletError`] variant.
//!
//! # Example
//!
//! ```no_run
//! use binance_wallet_manager::{Params, Settings, WalletManager};
//!
//! fn main() -> anyhow::Result<()> {
//!     let manager = WalletManager::new(Settings::resolve())?;
//!
//!     let usdt = manager.get_balance(Some("USDT"))?;
//!     println!("{}", serde_json::to_string_pretty(&usdt)?);
//!
//!     let address = manager.get_deposit_address("USDT", Some("ERC20"), &Params::new())?;
//!     println!("Deposit to {:?}", address.address);
//!     Ok(())
//! }
//! ```

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::binance::BinanceClient;
use crate::config::{ClientConfig, Credentials, Settings};
use crate::error::{HistoryKind, WalletError, WalletResult};
use crate::exchange::{
    AssetBalance, Balance, ExchangeClient, ExchangeResult, Params, Transaction,
};

/// Result of [`WalletManager::get_balance`]
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceReport {
    /// One requested coin; all zero when the exchange did not list it
    Coin { coin: String, balance: AssetBalance },
    /// Full balance exactly as the client returned it
    All(Balance),
}

impl BalanceReport {
    pub fn coin(&self) -> Option<(&str, &AssetBalance)> {
        match self {
            BalanceReport::Coin { coin, balance } => Some((coin, balance)),
            BalanceReport::All(_) => None,
        }
    }

    pub fn all(&self) -> Option<&Balance> {
        match self {
            BalanceReport::All(balance) => Some(balance),
            BalanceReport::Coin { .. } => None,
        }
    }
}

impl Serialize for BalanceReport {
    /// A single coin serializes as `{"BNB": {"free": .., "used": .., "total": ..}}`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BalanceReport::Coin { coin, balance } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(coin, balance)?;
                map.end()
            }
            BalanceReport::All(balance) => balance.serialize(serializer),
        }
    }
}

/// Result of [`WalletManager::withdraw`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalResult {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub coin: String,
    pub amount: Decimal,
    pub address: String,
    pub network: Option<String>,
    /// Raw exchange response
    pub info: serde_json::Value,
}

/// Result of [`WalletManager::get_deposit_address`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositAddressResult {
    pub success: bool,
    pub coin: String,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub network: Option<String>,
    /// Raw exchange response
    pub info: serde_json::Value,
}

/// Wallet operations bound to one exchange client
#[derive(Debug)]
pub struct WalletManager<C = BinanceClient> {
    settings: Settings,
    client: C,
}

impl WalletManager<BinanceClient> {
    /// Build a manager backed by [`BinanceClient`].
    pub fn new(settings: Settings) -> WalletResult<Self> {
        Self::with_client_builder(settings, |credentials, config| {
            BinanceClient::new(credentials, config.clone())
        })
    }

    /// Resolve settings from the environment and build a Binance-backed manager.
    pub fn from_env() -> WalletResult<Self> {
        Self::new(Settings::resolve())
    }
}

impl<C: ExchangeClient> WalletManager<C> {
    /// Build a manager with a custom client constructor.
    ///
    /// Credentials are checked before `build` is called. When
    /// `settings.use_testnet` is set the client is switched to sandbox mode.
    pub fn with_client_builder<F>(settings: Settings, build: F) -> WalletResult<Self>
    where
        F: FnOnce(Credentials, &ClientConfig) -> ExchangeResult<C>,
    {
        if !settings.is_valid() {
            return Err(WalletError::Configuration(format!(
                "please set {} (environment or .env file)",
                settings.missing_credentials().join(" and ")
            )));
        }

        let mut client = build(settings.credentials(), &settings.client)
            .map_err(WalletError::ClientInitialization)?;

        if settings.use_testnet {
            client
                .set_sandbox_mode(true)
                .map_err(WalletError::ClientInitialization)?;
        }

        info!(
            "Wallet manager ready ({})",
            if settings.use_testnet { "Testnet" } else { "Live" }
        );

        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn is_testnet(&self) -> bool {
        self.settings.use_testnet
    }

    /// Balance for `coin`, or the complete balance when `coin` is `None`.
    ///
    /// A coin the exchange does not list yields a zero record, not an error.
    pub fn get_balance(&self, coin: Option<&str>) -> WalletResult<BalanceReport> {
        debug!("Fetching balance (coin={:?})", coin);

        let balance = self.client.fetch_balance().map_err(|e| {
            warn!("Balance fetch failed: {}", e);
            WalletError::BalanceFetch(e)
        })?;

        match coin.filter(|c| !c.is_empty()) {
            Some(coin) => Ok(BalanceReport::Coin {
                coin: coin.to_string(),
                balance: balance.asset(coin).unwrap_or_default(),
            }),
            None => Ok(BalanceReport::All(balance)),
        }
    }

    /// Withdraw `amount` of `coin` to `address`.
    ///
    /// `network` and `tag` become request parameters, then `extra` is merged
    /// on top (so `extra` wins on key collisions). The amount is forwarded
    /// as is; the exchange rejects invalid values.
    pub fn withdraw(
        &self,
        coin: &str,
        amount: Decimal,
        address: &str,
        network: Option<&str>,
        tag: Option<&str>,
        extra: &Params,
    ) -> WalletResult<WithdrawalResult> {
        let network = network.filter(|n| !n.is_empty());
        let tag = tag.filter(|t| !t.is_empty());
        let params = merge_params(&[("network", network), ("tag", tag)], extra);

        info!(
            "Submitting withdrawal: {} {} to {} (network={:?})",
            amount, coin, address, network
        );

        let response = self
            .client
            .withdraw(coin, amount, address, tag, &params)
            .map_err(|e| {
                warn!("Withdrawal of {} {} failed: {}", amount, coin, e);
                WalletError::Withdrawal(e)
            })?;

        info!("Withdrawal accepted (id={:?})", response.id);

        Ok(WithdrawalResult {
            success: true,
            transaction_id: response.id,
            coin: coin.to_string(),
            amount,
            address: address.to_string(),
            network: network.map(str::to_string),
            info: response.info,
        })
    }

    /// Deposit address for `coin`, optionally on a specific `network`.
    pub fn get_deposit_address(
        &self,
        coin: &str,
        network: Option<&str>,
        extra: &Params,
    ) -> WalletResult<DepositAddressResult> {
        let network = network.filter(|n| !n.is_empty());
        let params = merge_params(&[("network", network)], extra);

        debug!("Fetching deposit address for {} (network={:?})", coin, network);

        let address = self
            .client
            .fetch_deposit_address(coin, &params)
            .map_err(|e| {
                warn!("Deposit address lookup for {} failed: {}", coin, e);
                WalletError::DepositAddress(e)
            })?;

        Ok(DepositAddressResult {
            success: true,
            coin: coin.to_string(),
            address: address.address,
            tag: address.tag,
            network: network.map(str::to_string),
            info: address.info,
        })
    }

    /// Deposits, oldest first. An empty list is a valid answer.
    pub fn get_deposit_history(
        &self,
        coin: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        extra: &Params,
    ) -> WalletResult<Vec<Transaction>> {
        debug!(
            "Fetching deposit history (coin={:?}, since={:?}, limit={:?})",
            coin, since, limit
        );
        let deposits = self
            .client
            .fetch_deposits(coin, since, limit, extra)
            .map_err(|e| history_error(HistoryKind::Deposits, e))?;
        Ok(cap(deposits, limit))
    }

    /// Withdrawals, oldest first. An empty list is a valid answer.
    pub fn get_withdrawal_history(
        &self,
        coin: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        extra: &Params,
    ) -> WalletResult<Vec<Transaction>> {
        debug!(
            "Fetching withdrawal history (coin={:?}, since={:?}, limit={:?})",
            coin, since, limit
        );
        let withdrawals = self
            .client
            .fetch_withdrawals(coin, since, limit, extra)
            .map_err(|e| history_error(HistoryKind::Withdrawals, e))?;
        Ok(cap(withdrawals, limit))
    }
}

/// Explicit parameters first, then `extra` on top.
fn merge_params(explicit: &[(&str, Option<&str>)], extra: &Params) -> Params {
    let mut params: Params = explicit
        .iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.to_string())))
        .collect();
    params.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    params
}

fn history_error(kind: HistoryKind, source: crate::exchange::ExchangeError) -> WalletError {
    warn!("{} history fetch failed: {}", kind, source);
    WalletError::HistoryFetch { kind, source }
}

fn cap(mut transactions: Vec<Transaction>, limit: Option<u32>) -> Vec<Transaction> {
    if let Some(limit) = limit {
        transactions.truncate(limit as usize);
    }
    transactions
}
