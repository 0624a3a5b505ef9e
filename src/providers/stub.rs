//! Scripted provider for exercising the generic client in tests
//!
//! Pages are driven entirely by the response body: the results live under
//! `results` and an absolute next-page URL may ride along under `next`.
//! A shared skip counter stands in for provider-side filtering.

use super::{Provider, ProviderRequest, ProviderResponse};
use crate::error::SearchError;
use crate::results::{PageCursor, SearchHit};
use crate::search::RateLimitState;
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub(crate) struct StubProvider {
    api_base: String,
    skip: Arc<Mutex<usize>>,
}

impl StubProvider {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            skip: Arc::new(Mutex::new(0)),
        }
    }

    /// Shared handle to the skip counter; each filtered record consumes
    /// one count.
    pub fn skip_counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.skip)
    }
}

impl Provider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn results_field(&self) -> &str {
        "results"
    }

    fn filter_hit(&self, _raw: &Value) -> bool {
        let mut skip = self.skip.lock().unwrap();
        if *skip > 0 {
            *skip -= 1;
            true
        } else {
            false
        }
    }

    fn next_page_cursor(&self, _response: &ProviderResponse, body: &Value) -> Option<PageCursor> {
        body.get("next").and_then(Value::as_str).map(PageCursor::new)
    }

    fn rate_limit_from_headers(&self, response: &ProviderResponse) -> Option<RateLimitState> {
        let remaining = response.header("X-RateLimit-Remaining")?.parse().ok()?;
        let reset_at = response.header("X-RateLimit-Reset")?.parse().ok()?;
        Some(RateLimitState::new(remaining, reset_at))
    }

    fn rate_limit_probe(&self) -> ProviderRequest {
        ProviderRequest::get(format!("{}rate_limit", self.api_base))
    }

    fn rate_limit_from_probe(&self, body: &Value) -> Result<RateLimitState, SearchError> {
        let remaining = body
            .get("remaining")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::malformed("stub", "probe body missing remaining"))?;
        let reset_at = body
            .get("reset")
            .and_then(Value::as_i64)
            .ok_or_else(|| SearchError::malformed("stub", "probe body missing reset"))?;
        Ok(RateLimitState::new(remaining, reset_at))
    }

    fn map_hit(&self, raw: &Value) -> SearchHit {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let fields = raw.as_object().cloned().unwrap_or_default();
        SearchHit::new(name, fields, raw.to_string())
    }
}
