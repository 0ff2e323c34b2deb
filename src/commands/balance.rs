//! Balance command

use anyhow::Result;
use binance_wallet_manager::{report, BalanceReport, Settings};
use tracing::info;

use super::{banner, connect};

pub fn run(settings: Settings, coin: Option<String>, top: usize, json: bool) -> Result<()> {
    let manager = connect(settings)?;

    info!("Fetching balance (coin={:?})", coin);
    let result = manager.get_balance(coin.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match &result {
        BalanceReport::Coin { coin, balance } => {
            banner(&format!("BALANCE: {}", coin));
            println!("{}", report::coin_balance(coin, balance));
        }
        BalanceReport::All(balance) => {
            banner(&format!(
                "BINANCE {} BALANCE REPORT",
                if manager.is_testnet() { "TESTNET" } else { "LIVE" }
            ));
            println!("{}", report::balance_table(balance, top));
        }
    }

    Ok(())
}
