//! Deposit / withdrawal history commands

use anyhow::Result;
use binance_wallet_manager::{report, Settings};

use super::{banner, connect, parse_params, parse_since};

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Deposits,
    Withdrawals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Summary,
    Table,
    Json,
}

impl Output {
    pub fn from_flags(json: bool, table: bool) -> Self {
        match (json, table) {
            (true, _) => Output::Json,
            (false, true) => Output::Table,
            (false, false) => Output::Summary,
        }
    }
}

pub fn run(
    settings: Settings,
    direction: Direction,
    coin: Option<String>,
    since: Option<String>,
    limit: Option<u32>,
    params: Vec<String>,
    output: Output,
) -> Result<()> {
    let extra = parse_params(&params)?;
    let since = since.as_deref().map(parse_since).transpose()?;
    let manager = connect(settings)?;

    let (title, records) = match direction {
        Direction::Deposits => (
            "DEPOSIT HISTORY",
            manager.get_deposit_history(coin.as_deref(), since, limit, &extra)?,
        ),
        Direction::Withdrawals => (
            "WITHDRAWAL HISTORY",
            manager.get_withdrawal_history(coin.as_deref(), since, limit, &extra)?,
        ),
    };

    if output == Output::Json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    banner(title);
    println!("Records: {}\n", records.len());
    if records.is_empty() {
        return Ok(());
    }

    match output {
        Output::Table => println!("{}", report::transaction_table(&records)),
        _ => println!("{}", report::transaction_summary(&records, records.len())),
    }

    Ok(())
}
