//! Plain-text reports for the command line

use rust_decimal::Decimal;

use crate::exchange::{AssetBalance, Balance, Transaction};
use crate::wallet::{DepositAddressResult, WithdrawalResult};

const WIDTH: usize = 80;

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

fn fmt_amount(value: Decimal) -> String {
    format!("{:.8}", value)
}

/// Table of assets with a positive balance, largest first, at most `top` rows.
pub fn balance_table(balance: &Balance, top: usize) -> String {
    let held = balance.non_zero();
    let mut out = String::new();

    out.push_str(&format!("Total Coins with Balance: {}\n", held.len()));
    out.push_str(&format!("{}\n", rule('-')));
    out.push_str(&format!(
        "{:<15} {:<20} {:<20} {:<20}\n",
        "COIN", "FREE", "USED", "TOTAL"
    ));
    out.push_str(&format!("{}\n", rule('-')));

    for (coin, amounts) in held.iter().take(top) {
        out.push_str(&format!(
            "{:<15} {:<20} {:<20} {:<20}\n",
            coin,
            fmt_amount(amounts.free),
            fmt_amount(amounts.used),
            fmt_amount(amounts.total)
        ));
    }

    if held.len() > top {
        out.push_str(&format!(
            "\n... and {} more coins with balance\n",
            held.len() - top
        ));
    }
    out.push_str(&rule('-'));
    out
}

pub fn coin_balance(coin: &str, amounts: &AssetBalance) -> String {
    format!(
        "Coin: {}\n  Free:  {}\n  Used:  {}\n  Total: {}",
        coin,
        fmt_amount(amounts.free),
        fmt_amount(amounts.used),
        fmt_amount(amounts.total)
    )
}

pub fn deposit_address(result: &DepositAddressResult) -> String {
    let mut out = format!(
        "Coin:    {}\nNetwork: {}\nAddress: {}",
        result.coin,
        result.network.as_deref().unwrap_or("Default"),
        result.address.as_deref().unwrap_or("N/A")
    );
    if let Some(tag) = &result.tag {
        out.push_str(&format!("\nTag/Memo: {}", tag));
    }
    out
}

pub fn withdrawal_receipt(result: &WithdrawalResult) -> String {
    format!(
        "Withdrawal submitted\n  TX ID:   {}\n  Coin:    {}\n  Amount:  {}\n  Address: {}\n  Network: {}",
        result.transaction_id.as_deref().unwrap_or("N/A"),
        result.coin,
        result.amount,
        result.address,
        result.network.as_deref().unwrap_or("Default")
    )
}

/// Numbered one-line summaries of the first `max` transactions.
pub fn transaction_summary(transactions: &[Transaction], max: usize) -> String {
    transactions
        .iter()
        .take(max)
        .enumerate()
        .map(|(i, tx)| {
            format!(
                "  {}. {} - Amount: {} - Status: {}",
                i + 1,
                tx.currency,
                tx.amount,
                tx.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detailed history table
pub fn transaction_table(transactions: &[Transaction]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:<8} {:<18} {:<10} {:<10} {}\n",
        "TIME (UTC)", "COIN", "AMOUNT", "NETWORK", "STATUS", "TXID"
    ));
    out.push_str(&format!("{}\n", rule('-')));

    for tx in transactions {
        let when = tx
            .datetime
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!(
            "{:<20} {:<8} {:<18} {:<10} {:<10} {}\n",
            when,
            tx.currency,
            tx.amount,
            tx.network.as_deref().unwrap_or("-"),
            tx.status,
            tx.txid.as_deref().unwrap_or("-")
        ));
    }
    out.push_str(&rule('-'));
    out
}
