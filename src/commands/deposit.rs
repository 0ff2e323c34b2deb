//! Deposit address command

use anyhow::Result;
use binance_wallet_manager::{report, Settings};

use super::{banner, connect, parse_params};

pub fn run(
    settings: Settings,
    coin: String,
    network: Option<String>,
    params: Vec<String>,
    json: bool,
) -> Result<()> {
    let extra = parse_params(&params)?;
    let manager = connect(settings)?;

    let result = manager.get_deposit_address(&coin, network.as_deref(), &extra)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        banner("DEPOSIT ADDRESS");
        println!("{}", report::deposit_address(&result));
    }

    Ok(())
}
