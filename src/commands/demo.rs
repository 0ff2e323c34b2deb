//! Demo command - exercise every read-only wallet operation
//!
//! Each step reports its own failure and the walk-through continues.

use anyhow::Result;
use binance_wallet_manager::{report, BalanceReport, Params, Settings};

use super::connect;

pub fn run(settings: Settings) -> Result<()> {
    println!("=== Binance Wallet Manager ===\n");

    let manager = connect(settings)?;
    let no_params = Params::new();
    println!();

    println!("--- Example 1: Get Balance ---");
    match manager.get_balance(None) {
        Ok(BalanceReport::All(balance)) => {
            println!("✓ Balance retrieved successfully");
            println!("\nNon-zero balances:");
            for (coin, amounts) in balance.non_zero() {
                println!("  {}: {}", coin, amounts.total);
            }
        }
        Ok(other) => println!("✓ {}", serde_json::to_string(&other)?),
        Err(e) => println!("✗ Error getting balance: {}", e),
    }
    println!();

    println!("--- Example 2: Get Deposit Address ---");
    println!("Getting USDT deposit address (ERC20 network)...");
    match manager.get_deposit_address("USDT", Some("ERC20"), &no_params) {
        Ok(result) => {
            println!("✓ Deposit address: {}", result.address.as_deref().unwrap_or("N/A"));
            if let Some(tag) = &result.tag {
                println!("  Tag/Memo: {}", tag);
            }
        }
        Err(e) => println!("✗ Error getting deposit address: {}", e),
    }
    println!();

    println!("--- Example 3: Withdraw (not executed) ---");
    println!("Withdrawals are only submitted by the `withdraw` subcommand with --confirm:");
    println!(
        "\n    binance-wallet withdraw --coin USDT --amount 10.0 \\\n        --address 0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb --network ERC20 --confirm\n"
    );

    println!("--- Example 4: Get Deposit History ---");
    match manager.get_deposit_history(None, None, Some(5), &no_params) {
        Ok(deposits) => {
            println!("✓ Found {} recent deposits", deposits.len());
            if !deposits.is_empty() {
                println!("{}", report::transaction_summary(&deposits, 3));
            }
        }
        Err(e) => println!("✗ Error getting deposit history: {}", e),
    }
    println!();

    println!("--- Example 5: Get Withdrawal History ---");
    match manager.get_withdrawal_history(None, None, Some(5), &no_params) {
        Ok(withdrawals) => {
            println!("✓ Found {} recent withdrawals", withdrawals.len());
            if !withdrawals.is_empty() {
                println!("{}", report::transaction_summary(&withdrawals, 3));
            }
        }
        Err(e) => println!("✗ Error getting withdrawal history: {}", e),
    }
    println!();

    println!("=== Demo Complete ===");
    Ok(())
}
