//! Exchange client abstraction
//!
//! The wallet façade only talks to an [`ExchangeClient`]. The default
//! implementation is [`crate::binance::BinanceClient`]; tests and alternative
//! venues can provide their own.

pub mod error;
pub mod types;

pub use error::{ExchangeError, ExchangeResult};
pub use types::{
    AssetBalance, Balance, DepositAddress, Fee, Params, Transaction, TransactionKind,
    TransactionStatus, WithdrawalResponse,
};

use rust_decimal::Decimal;

/// Authenticated wallet endpoints of an exchange.
///
/// All calls block until the exchange answers. Implementations apply their
/// own timeout and rate limiting; callers do not retry.
pub trait ExchangeClient {
    /// Route subsequent calls to the exchange's sandbox (testnet) environment.
    fn set_sandbox_mode(&mut self, enabled: bool) -> ExchangeResult<()>;

    fn fetch_balance(&self) -> ExchangeResult<Balance>;

    /// Submit a withdrawal of `amount` of `code` to `address`.
    fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        params: &Params,
    ) -> ExchangeResult<WithdrawalResponse>;

    fn fetch_deposit_address(&self, code: &str, params: &Params) -> ExchangeResult<DepositAddress>;

    /// Deposits ordered oldest first. `since` is in milliseconds.
    fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> ExchangeResult<Vec<Transaction>>;

    /// Withdrawals ordered oldest first. `since` is in milliseconds.
    fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> ExchangeResult<Vec<Transaction>>;
}
