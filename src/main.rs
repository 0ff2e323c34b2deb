//! Binance wallet manager - command line entry point
//!
//! Subcommands:
//! - config: show the resolved configuration (credentials masked)
//! - balance: wallet balances
//! - deposit-address: deposit address for a coin / network
//! - withdraw: submit a withdrawal (requires --confirm)
//! - deposits / withdrawals: transfer history
//! - demo: walk through the read-only operations

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use binance_wallet_manager::Settings;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "binance-wallet")]
#[command(about = "Binance wallet operations: balances, deposits and withdrawals", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the resolved configuration with credentials masked
    Config {
        /// Also check connectivity to the spot API
        #[arg(long)]
        ping: bool,
    },

    /// Show wallet balances
    Balance {
        /// Coin to show (e.g. BTC, USDT). Omit for all non-zero balances
        #[arg(short, long)]
        coin: Option<String>,

        /// Number of coins listed in the table
        #[arg(long, default_value = "20")]
        top: usize,

        /// List every non-zero balance
        #[arg(long, conflicts_with = "top")]
        all: bool,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Get the deposit address for a coin
    DepositAddress {
        /// Coin symbol (e.g. USDT)
        #[arg(short, long)]
        coin: String,

        /// Network (e.g. ERC20, TRC20, BEP20)
        #[arg(short, long)]
        network: Option<String>,

        /// Extra exchange parameter as key=value. Can be used multiple times.
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Withdraw to an external address (CAUTION - MOVES REAL FUNDS ON PRODUCTION)
    Withdraw {
        /// Coin symbol (e.g. USDT)
        #[arg(short, long)]
        coin: String,

        /// Amount to withdraw
        #[arg(short, long)]
        amount: Decimal,

        /// Destination address
        #[arg(long)]
        address: String,

        /// Network (e.g. ERC20, TRC20, BEP20)
        #[arg(short, long)]
        network: Option<String>,

        /// Address tag / memo (XRP, XLM, ...)
        #[arg(short, long)]
        tag: Option<String>,

        /// Extra exchange parameter as key=value. Can be used multiple times.
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,

        /// Required to actually submit the withdrawal
        #[arg(long)]
        confirm: bool,
    },

    /// Show deposit history
    Deposits {
        #[command(flatten)]
        query: HistoryArgs,
    },

    /// Show withdrawal history
    Withdrawals {
        #[command(flatten)]
        query: HistoryArgs,
    },

    /// Run the read-only operations one after another
    Demo,
}

#[derive(clap::Args, Debug)]
struct HistoryArgs {
    /// Coin symbol filter
    #[arg(short, long)]
    coin: Option<String>,

    /// Start time: milliseconds since epoch or YYYY-MM-DD
    #[arg(long)]
    since: Option<String>,

    /// Maximum number of records
    #[arg(short, long)]
    limit: Option<u32>,

    /// Extra exchange parameter as key=value. Can be used multiple times.
    #[arg(short = 'p', long = "param")]
    params: Vec<String>,

    /// Detailed table instead of numbered summary lines
    #[arg(long)]
    table: bool,

    /// Print the raw JSON result
    #[arg(long)]
    json: bool,
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // Log file naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // LOG_LEVEL sets the default; --verbose forces debug. Noisy HTTP crates stay at warn.
    let level = if verbose {
        "debug".to_string()
    } else {
        std::env::var("LOG_LEVEL")
            .map(|l| l.to_lowercase())
            .unwrap_or_else(|_| "info".to_string())
    };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    // Same format without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Credentials may live in a .env file next to the binary's working dir
    dotenv::dotenv().ok();

    let command_name = match &cli.command {
        Commands::Config { .. } => "config",
        Commands::Balance { .. } => "balance",
        Commands::DepositAddress { .. } => "deposit_address",
        Commands::Withdraw { .. } => "withdraw",
        Commands::Deposits { .. } => "deposits",
        Commands::Withdrawals { .. } => "withdrawals",
        Commands::Demo => "demo",
    };

    setup_logging(cli.verbose, command_name)?;

    let settings = Settings::resolve();

    match cli.command {
        Commands::Config { ping } => commands::config::run(settings, ping),

        Commands::Balance {
            coin,
            top,
            all,
            json,
        } => {
            let top = if all { usize::MAX } else { top };
            commands::balance::run(settings, coin, top, json)
        }

        Commands::DepositAddress {
            coin,
            network,
            params,
            json,
        } => commands::deposit::run(settings, coin, network, params, json),

        Commands::Withdraw {
            coin,
            amount,
            address,
            network,
            tag,
            params,
            confirm,
        } => commands::withdraw::run(
            settings,
            commands::withdraw::WithdrawArgs {
                coin,
                amount,
                address,
                network,
                tag,
                params,
                confirm,
            },
        ),

        Commands::Deposits { query } => commands::history::run(
            settings,
            commands::history::Direction::Deposits,
            query.coin,
            query.since,
            query.limit,
            query.params,
            commands::history::Output::from_flags(query.json, query.table),
        ),

        Commands::Withdrawals { query } => commands::history::run(
            settings,
            commands::history::Direction::Withdrawals,
            query.coin,
            query.since,
            query.limit,
            query.params,
            commands::history::Output::from_flags(query.json, query.table),
        ),

        Commands::Demo => commands::demo::run(settings),
    }
}
