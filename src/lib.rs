//! RepoBuzz: finds social commentary about recently active repositories
//!
//! The core is a generic, provider-agnostic search client: one
//! orchestrator that gates every request on the provider's rate-limit
//! quota, follows server-provided pagination cursors transparently, and
//! exposes a lazily extended result sequence. Providers plug in through
//! the [`providers::Provider`] capability set; the GitHub and Twitter
//! adapters supply the provider-specific encoding, parsing, and
//! filtering.

pub mod args;
pub mod config;
pub mod correlate;
pub mod error;
pub mod network;
pub mod providers;
pub mod report;
pub mod results;
pub mod search;

pub use config::Settings;
pub use error::SearchError;
pub use providers::Provider;
pub use results::{ResultSet, SearchHit};
pub use search::SearchClient;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
