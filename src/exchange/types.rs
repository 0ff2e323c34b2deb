//! Normalized records returned by exchange clients
//!
//! Every record keeps the untouched exchange payload in `info` so callers
//! can reach fields the normalized shape does not cover.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extra request parameters forwarded verbatim to the exchange.
pub type Params = BTreeMap<String, String>;

/// Free / used / total amounts for one asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub free: Decimal,
    pub used: Decimal,
    pub total: Decimal,
}

impl AssetBalance {
    pub fn new(free: Decimal, used: Decimal) -> Self {
        Self {
            free,
            used,
            total: free + used,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero()
    }
}

/// Full account balance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub free: BTreeMap<String, Decimal>,
    pub used: BTreeMap<String, Decimal>,
    pub total: BTreeMap<String, Decimal>,
    /// Exchange update time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Balance {
    /// Record an asset in all three maps.
    pub fn insert(&mut self, asset: impl Into<String>, amounts: AssetBalance) {
        let asset = asset.into();
        self.free.insert(asset.clone(), amounts.free);
        self.used.insert(asset.clone(), amounts.used);
        self.total.insert(asset, amounts.total);
    }

    /// Amounts for `asset`, or `None` if the exchange did not list it.
    ///
    /// Presence is decided by the `total` map; missing `free`/`used`
    /// entries read as zero.
    pub fn asset(&self, asset: &str) -> Option<AssetBalance> {
        let total = *self.total.get(asset)?;
        Some(AssetBalance {
            free: self.free.get(asset).copied().unwrap_or_default(),
            used: self.used.get(asset).copied().unwrap_or_default(),
            total,
        })
    }

    /// Assets with a positive total, largest first.
    pub fn non_zero(&self) -> Vec<(String, AssetBalance)> {
        let mut held: Vec<(String, AssetBalance)> = self
            .total
            .keys()
            .filter_map(|asset| self.asset(asset).map(|amounts| (asset.clone(), amounts)))
            .filter(|(_, amounts)| amounts.total > Decimal::ZERO)
            .collect();
        held.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(&b.0)));
        held
    }
}

/// Direction of a wallet transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Ok,
    Failed,
    Canceled,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Ok => write!(f, "ok"),
            TransactionStatus::Failed => write!(f, "failed"),
            TransactionStatus::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub currency: String,
    pub cost: Decimal,
}

/// One deposit or withdrawal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    pub txid: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub currency: String,
    pub amount: Decimal,
    pub network: Option<String>,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub status: TransactionStatus,
    /// Milliseconds since epoch
    pub timestamp: Option<i64>,
    pub datetime: Option<DateTime<Utc>>,
    pub fee: Option<Fee>,
    #[serde(default)]
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub currency: String,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub network: Option<String>,
    #[serde(default)]
    pub info: serde_json::Value,
}

/// Acknowledgement of a submitted withdrawal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub info: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_balance_total() {
        let amounts = AssetBalance::new(dec!(1.5), dec!(0.25));
        assert_eq!(amounts.total, dec!(1.75));
        assert!(AssetBalance::zero().is_zero());
    }

    #[test]
    fn test_balance_lookup_uses_total_map() {
        let mut balance = Balance::default();
        balance.total.insert("BTC".into(), dec!(2));
        balance.free.insert("BTC".into(), dec!(2));

        let btc = balance.asset("BTC").unwrap();
        assert_eq!(btc.free, dec!(2));
        assert_eq!(btc.used, Decimal::ZERO);
        assert_eq!(btc.total, dec!(2));

        // Listed in free only: not considered present
        balance.free.insert("ETH".into(), dec!(1));
        assert!(balance.asset("ETH").is_none());
    }

    #[test]
    fn test_non_zero_sorted_descending() {
        let mut balance = Balance::default();
        balance.insert("BTC", AssetBalance::new(dec!(1), dec!(0)));
        balance.insert("USDT", AssetBalance::new(dec!(10000), dec!(500)));
        balance.insert("XRP", AssetBalance::zero());
        balance.insert("ETH", AssetBalance::new(dec!(0), dec!(3)));

        let held = balance.non_zero();
        let names: Vec<&str> = held.iter().map(|(asset, _)| asset.as_str()).collect();
        assert_eq!(names, vec!["USDT", "ETH", "BTC"]);
    }

    #[test]
    fn test_transaction_status_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionStatus::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
        assert_eq!(TransactionKind::Withdrawal.to_string(), "withdrawal");
    }
}
