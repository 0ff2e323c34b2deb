//! Withdraw command
//!
//! Refuses to submit anything unless `--confirm` is passed.

use anyhow::{bail, Result};
use binance_wallet_manager::{report, Settings};
use rust_decimal::Decimal;
use tracing::warn;

use super::{banner, connect, parse_params};

#[derive(Debug)]
pub struct WithdrawArgs {
    pub coin: String,
    pub amount: Decimal,
    pub address: String,
    pub network: Option<String>,
    pub tag: Option<String>,
    pub params: Vec<String>,
    pub confirm: bool,
}

pub fn run(settings: Settings, args: WithdrawArgs) -> Result<()> {
    let extra = parse_params(&args.params)?;

    banner("WITHDRAWAL");
    println!("  Coin:    {}", args.coin);
    println!("  Amount:  {}", args.amount);
    println!("  Address: {}", args.address);
    println!("  Network: {}", args.network.as_deref().unwrap_or("Default"));
    if let Some(tag) = &args.tag {
        println!("  Tag:     {}", tag);
    }
    println!(
        "  Mode:    {}",
        if settings.use_testnet { "TESTNET" } else { "LIVE" }
    );

    if !args.confirm {
        bail!("Withdrawal not submitted: re-run with --confirm to send funds");
    }

    if !settings.use_testnet {
        warn!("⚠️  LIVE WITHDRAWAL - REAL FUNDS WILL MOVE");
    }

    let manager = connect(settings)?;
    let result = manager.withdraw(
        &args.coin,
        args.amount,
        &args.address,
        args.network.as_deref(),
        args.tag.as_deref(),
        &extra,
    )?;

    println!("✓ {}", report::withdrawal_receipt(&result));
    Ok(())
}
