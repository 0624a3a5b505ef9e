//! Error types for search operations

use thiserror::Error;

/// Errors surfaced by the search client and its collaborators
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider answered with a non-success HTTP status. The raw
    /// error payload is attached verbatim, not parsed further.
    #[error("{provider} request failed with HTTP {status}: {body}")]
    Provider {
        provider: String,
        status: u16,
        body: String,
    },

    /// A successful response was missing an expected field or had the
    /// wrong shape.
    #[error("malformed {provider} response: {detail}")]
    MalformedResponse { provider: String, detail: String },

    /// The credential exchange produced something other than the
    /// expected token type. Fatal, never retried.
    #[error("{provider} credential exchange failed: {detail}")]
    Authentication { provider: String, detail: String },

    /// A caller advanced past the last available result.
    #[error("no further search results to iterate")]
    IterationExhausted,

    /// The underlying transport failed before a response was produced.
    #[error("{provider} transport error: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
}

impl SearchError {
    pub(crate) fn malformed(provider: &str, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn transport(provider: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            provider: provider.to_string(),
            source,
        }
    }
}
