//! Binance wallet API client
//!
//! Signed REST access to account balances and the capital (deposit /
//! withdrawal) endpoints. Spot calls can be routed to the public testnet;
//! wallet calls are production only.

pub mod auth;
mod client;
pub mod parse;

pub use client::BinanceClient;
