//! Request signing for Binance `SIGNED` endpoints
//!
//! The signature is HMAC-SHA256 over the exact, already-encoded query
//! string, keyed with the API secret and hex encoded.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key on every authenticated request
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Generate the hex HMAC-SHA256 signature of `query`.
///
/// # Example
///
/// ```
/// use binance_wallet_manager::binance::auth::sign_query;
///
/// let signature = sign_query("coin=BTC&timestamp=1499827319559", "secret");
/// assert_eq!(signature.len(), 64);
/// ```
pub fn sign_query(query: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
