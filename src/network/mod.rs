//! HTTP networking module
//!
//! Provides the connector used to dispatch provider requests.

mod client;

pub use client::HttpClient;
