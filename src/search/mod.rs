//! Search orchestration module
//!
//! Coordinates query execution against one provider: quota admission,
//! dispatch, page parsing, and cursor tracking.

mod client;
mod ratelimit;

pub use client::SearchClient;
pub use ratelimit::{RateLimitGuard, RateLimitState};
