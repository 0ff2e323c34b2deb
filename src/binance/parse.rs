//! Binance response decoding and normalization
//!
//! Raw payload shapes follow the Binance REST documentation; everything is
//! converted into the venue-neutral records in [`crate::exchange::types`].

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::exchange::{
    AssetBalance, Balance, DepositAddress, ExchangeError, ExchangeResult, Fee, Transaction,
    TransactionKind, TransactionStatus, WithdrawalResponse,
};

/// Unified network names and their Binance ids
const NETWORKS: &[(&str, &str)] = &[
    ("ERC20", "ETH"),
    ("TRC20", "TRX"),
    ("BEP20", "BSC"),
    ("BEP2", "BNB"),
    ("SPL", "SOL"),
    ("POLYGON", "MATIC"),
    ("ARB", "ARBITRUM"),
    ("OPTIMISM", "OPTIMISM"),
];

/// Map a unified network name (`ERC20`) to the Binance id (`ETH`).
pub fn network_code_to_id(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    NETWORKS
        .iter()
        .find(|(unified, _)| *unified == upper)
        .map(|(_, id)| id.to_string())
        .unwrap_or(upper)
}

/// Map a Binance network id (`TRX`) back to the unified name (`TRC20`).
pub fn network_id_to_code(id: &str) -> String {
    NETWORKS
        .iter()
        .find(|(_, binance)| *binance == id)
        .map(|(unified, _)| unified.to_string())
        .unwrap_or_else(|| id.to_string())
}

/// Binance error payload: `{"code": -2015, "msg": "..."}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

/// Turn a non-success response into an [`ExchangeError`].
pub fn error_from_response(status: u16, body: &str) -> ExchangeError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => ExchangeError::Api {
            status,
            code: err.code,
            message: err.msg,
        },
        Err(_) => ExchangeError::Http {
            status,
            body: body.trim().to_string(),
        },
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    #[serde(default)]
    balances: Vec<RawBalance>,
    #[serde(default)]
    update_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawBalance {
    asset: String,
    free: Decimal,
    locked: Decimal,
}

/// `GET /api/v3/account`
pub fn parse_balance(info: Value) -> ExchangeResult<Balance> {
    let account: RawAccount = serde_json::from_value(info.clone())?;

    let mut balance = Balance {
        timestamp: account.update_time,
        ..Balance::default()
    };
    for raw in account.balances {
        balance.insert(raw.asset, AssetBalance::new(raw.free, raw.locked));
    }
    balance.info = info;
    Ok(balance)
}

#[derive(Debug, Deserialize)]
struct RawDepositAddress {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    coin: Option<String>,
    #[serde(default)]
    tag: Option<String>,
}

/// `GET /sapi/v1/capital/deposit/address`
pub fn parse_deposit_address(
    info: Value,
    code: &str,
    network: Option<&str>,
) -> ExchangeResult<DepositAddress> {
    let raw: RawDepositAddress = serde_json::from_value(info.clone())?;
    Ok(DepositAddress {
        currency: raw.coin.unwrap_or_else(|| code.to_string()),
        address: non_empty(raw.address),
        tag: non_empty(raw.tag),
        network: network.map(network_id_to_code),
        info,
    })
}

/// `POST /sapi/v1/capital/withdraw/apply`
pub fn parse_withdrawal_response(info: Value) -> WithdrawalResponse {
    let id = match info.get("id") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };
    WithdrawalResponse { id, info }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeposit {
    #[serde(default)]
    id: Option<String>,
    amount: Decimal,
    coin: String,
    #[serde(default)]
    network: Option<String>,
    status: i64,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    address_tag: Option<String>,
    #[serde(default)]
    tx_id: Option<String>,
    #[serde(default)]
    insert_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWithdrawal {
    #[serde(default)]
    id: Option<String>,
    amount: Decimal,
    #[serde(default)]
    transaction_fee: Option<Decimal>,
    coin: String,
    #[serde(default)]
    network: Option<String>,
    status: i64,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    address_tag: Option<String>,
    #[serde(default)]
    tx_id: Option<String>,
    #[serde(default)]
    apply_time: Option<String>,
}

pub fn deposit_status(code: i64) -> TransactionStatus {
    match code {
        1 | 6 => TransactionStatus::Ok,
        7 => TransactionStatus::Failed,
        _ => TransactionStatus::Pending,
    }
}

pub fn withdrawal_status(code: i64) -> TransactionStatus {
    match code {
        1 => TransactionStatus::Canceled,
        3 | 5 => TransactionStatus::Failed,
        6 => TransactionStatus::Ok,
        _ => TransactionStatus::Pending,
    }
}

/// `GET /sapi/v1/capital/deposit/hisrec`
pub fn parse_deposits(info: Value) -> ExchangeResult<Vec<Transaction>> {
    expect_array(info)?
        .into_iter()
        .map(|item| {
            let raw: RawDeposit = serde_json::from_value(item.clone())?;
            Ok(Transaction {
                id: non_empty(raw.id),
                txid: non_empty(raw.tx_id),
                kind: TransactionKind::Deposit,
                currency: raw.coin,
                amount: raw.amount,
                network: raw.network.as_deref().map(network_id_to_code),
                address: non_empty(raw.address),
                tag: non_empty(raw.address_tag),
                status: deposit_status(raw.status),
                timestamp: raw.insert_time,
                datetime: raw.insert_time.and_then(DateTime::from_timestamp_millis),
                fee: None,
                info: item,
            })
        })
        .collect()
}

/// `GET /sapi/v1/capital/withdraw/history`
pub fn parse_withdrawals(info: Value) -> ExchangeResult<Vec<Transaction>> {
    expect_array(info)?
        .into_iter()
        .map(|item| {
            let raw: RawWithdrawal = serde_json::from_value(item.clone())?;
            let datetime = raw.apply_time.as_deref().and_then(parse_apply_time);
            let fee = raw.transaction_fee.map(|cost| Fee {
                currency: raw.coin.clone(),
                cost,
            });
            Ok(Transaction {
                id: non_empty(raw.id),
                txid: non_empty(raw.tx_id),
                kind: TransactionKind::Withdrawal,
                currency: raw.coin,
                amount: raw.amount,
                network: raw.network.as_deref().map(network_id_to_code),
                address: non_empty(raw.address),
                tag: non_empty(raw.address_tag),
                status: withdrawal_status(raw.status),
                timestamp: datetime.map(|dt| dt.timestamp_millis()),
                datetime,
                fee,
                info: item,
            })
        })
        .collect()
}

/// Sort oldest first, drop records before `since`, keep at most `limit`.
pub fn filter_by_since_limit(
    mut transactions: Vec<Transaction>,
    since: Option<i64>,
    limit: Option<u32>,
) -> Vec<Transaction> {
    transactions.sort_by_key(|tx| tx.timestamp);
    if let Some(since) = since {
        transactions.retain(|tx| tx.timestamp.is_some_and(|ts| ts >= since));
    }
    if let Some(limit) = limit {
        transactions.truncate(limit as usize);
    }
    transactions
}

/// `applyTime` is `YYYY-MM-DD HH:MM:SS` in UTC
fn parse_apply_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn expect_array(info: Value) -> ExchangeResult<Vec<Value>> {
    match info {
        Value::Array(items) => Ok(items),
        other => Err(ExchangeError::Parse(format!(
            "expected a JSON array, got {}",
            other
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
