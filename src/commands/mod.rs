//! Subcommand implementations

pub mod balance;
pub mod config;
pub mod demo;
pub mod deposit;
pub mod history;
pub mod withdraw;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use binance_wallet_manager::{Params, Settings, WalletManager};

/// Build the Binance-backed manager, printing setup hints on bad credentials.
pub fn connect(settings: Settings) -> Result<WalletManager> {
    if !settings.is_valid() {
        println!("⚠️  Configuration Error!");
        println!("Please set up your .env file with API credentials:");
        for name in settings.missing_credentials() {
            println!("  - {}", name);
        }
        println!("\nGet your testnet API keys from: https://testnet.binance.vision/");
    }

    let testnet = settings.use_testnet;
    let manager = WalletManager::new(settings).context("Failed to initialize wallet manager")?;
    println!(
        "✓ Connected to Binance {}",
        if testnet { "(Testnet)" } else { "(Live)" }
    );
    Ok(manager)
}

/// Parse repeated `key=value` arguments into request parameters.
pub fn parse_params(raw: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for item in raw {
        let Some((key, value)) = item.split_once('=') else {
            bail!("Invalid parameter {:?}: expected key=value", item);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid parameter {:?}: empty key", item);
        }
        params.insert(key.to_string(), value.trim().to_string());
    }
    Ok(params)
}

/// Accept either epoch milliseconds or a `YYYY-MM-DD` date (UTC midnight).
pub fn parse_since(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Ok(ms);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid --since {:?}: use epoch ms or YYYY-MM-DD", raw))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("Invalid --since date")?;
    Ok(midnight.and_utc().timestamp_millis())
}

pub fn banner(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("{}", title);
    println!("{}", "=".repeat(80));
}
