//! Common utilities shared by exchange clients

pub mod rate_limiter;

pub use rate_limiter::{RateLimiter, RateLimiterConfig};
