//! Binance Wallet Manager
//!
//! Wallet operations against the Binance testnet or production exchange:
//! balances, withdrawals, deposit addresses and deposit / withdrawal
//! history.
//!
//! Configuration comes from the environment (`BINANCE_API_KEY`,
//! `BINANCE_API_SECRET`, `BINANCE_TESTNET`, `BINANCE_SANDBOX`). The
//! [`WalletManager`] validates it, binds an [`ExchangeClient`] and forwards
//! each call, reporting failures as typed [`WalletError`] variants.
//!
//! ## Example
//! ```no_run
//! use binance_wallet_manager::{Params, Settings, WalletManager};
//!
//! fn main() -> anyhow::Result<()> {
//!     let manager = WalletManager::new(Settings::resolve())?;
//!
//!     let report = manager.get_balance(None)?;
//!     if let Some(balance) = report.all() {
//!         for (coin, amounts) in balance.non_zero() {
//!             println!("{}: {}", coin, amounts.total);
//!         }
//!     }
//!
//!     let deposits = manager.get_deposit_history(None, None, Some(5), &Params::new())?;
//!     println!("{} recent deposits", deposits.len());
//!     Ok(())
//! }
//! ```

pub mod binance;
pub mod common;
pub mod config;
pub mod error;
pub mod exchange;
pub mod report;
pub mod wallet;

pub use config::{ClientConfig, Credentials, Settings};
pub use error::{HistoryKind, WalletError, WalletResult};
pub use exchange::{
    AssetBalance, Balance, DepositAddress, ExchangeClient, ExchangeError, Params, Transaction,
    TransactionKind, TransactionStatus,
};
pub use wallet::{BalanceReport, DepositAddressResult, WalletManager, WithdrawalResult};

// Re-export the default exchange client for convenience
pub use binance::BinanceClient;
