//! Config command - show resolved settings

use anyhow::{Context, Result};
use binance_wallet_manager::{BinanceClient, ExchangeClient, Settings};
use tracing::info;

pub fn run(settings: Settings, ping: bool) -> Result<()> {
    println!("{}", settings.display());

    if !settings.is_valid() {
        println!(
            "⚠ Missing: {}",
            settings.missing_credentials().join(", ")
        );
    }

    if ping {
        let mut client = BinanceClient::new(settings.credentials(), settings.client.clone())
            .context("Failed to create Binance client")?;
        client
            .set_sandbox_mode(settings.use_testnet)
            .context("Failed to configure sandbox mode")?;

        info!("Pinging Binance spot API");
        match client.ping() {
            Ok(true) => println!("✓ Spot API reachable"),
            Ok(false) => println!("✗ Spot API answered with an error status"),
            Err(e) => println!("✗ Spot API unreachable: {}", e),
        }
    }

    Ok(())
}
