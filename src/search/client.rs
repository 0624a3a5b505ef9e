//! Generic, provider-agnostic search client

use super::ratelimit::{RateLimitGuard, RateLimitState};
use crate::error::SearchError;
use crate::network::HttpClient;
use crate::providers::{Provider, ProviderRequest, ProviderResponse};
use crate::results::{PageCursor, ResultSet, SearchHit};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const HEADER_AUTHORIZATION: &str = "Authorization";
const EXPECTED_STATUS: u16 = 200;

/// One parsed page of provider results
struct Page {
    hits: Vec<SearchHit>,
    cursor: Option<PageCursor>,
}

/// Issues search queries against a single provider, gating every request
/// on the provider quota and following pagination cursors transparently.
///
/// A client is constructed once per provider session and reused for all
/// pages of all queries issued through it. Cloning produces another
/// handle to the same session; calls against one session must be
/// serialized by the caller.
#[derive(Debug, Clone)]
pub struct SearchClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    provider: Box<dyn Provider>,
    http: HttpClient,
    limiter: RateLimitGuard,
}

impl SearchClient {
    pub fn new(provider: impl Provider + 'static, http: HttpClient) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                provider: Box::new(provider),
                http,
                limiter: RateLimitGuard::new(),
            }),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider.name()
    }

    /// Search calls left before the provider limit is reached
    pub fn remaining_searches(&self) -> u64 {
        self.inner.limiter.snapshot().remaining
    }

    /// Seconds until the provider restores the search quota
    pub fn seconds_until_reset(&self) -> i64 {
        self.inner.limiter.snapshot().seconds_until_reset()
    }

    /// Issue a query and produce the first page of results.
    ///
    /// `path` is resolved against the provider base URL and `query` is
    /// URL-escaped onto the end of it.
    pub async fn search(&self, path: &str, query: &str) -> Result<ResultSet, SearchError> {
        self.admit().await?;
        let url = format!(
            "{}{}{}",
            self.inner.provider.api_base(),
            path,
            urlencoding::encode(query)
        );
        let page = self.fetch_page(&url).await?;
        Ok(ResultSet::new(self.clone(), page.hits, page.cursor))
    }

    /// Append further pages to `results` until new records appear or no
    /// cursor remains. Returns the number of records appended.
    ///
    /// Filtering may reject a whole page, and a caller asking for more
    /// results expects to either receive some or learn definitively that
    /// none remain, so pages are consumed until one of them survives.
    pub async fn fetch_next_page(&self, results: &mut ResultSet) -> Result<usize, SearchError> {
        let before = results.size();
        while results.size() == before {
            let Some(cursor) = results.cursor().cloned() else {
                break;
            };
            self.admit().await?;
            let page = self.fetch_page(cursor.as_str()).await?;
            results.append_page(page.hits, page.cursor);
        }
        Ok(results.size() - before)
    }

    async fn admit(&self) -> Result<(), SearchError> {
        self.inner.limiter.admit(|| self.probe_quota()).await
    }

    /// Refresh the quota snapshot through the provider's out-of-band
    /// endpoint, which does not consume search quota.
    async fn probe_quota(&self) -> Result<RateLimitState, SearchError> {
        debug!("{}: probing search rate limit status", self.provider_name());
        let request = self.authorize(self.inner.provider.rate_limit_probe());
        let response = self.execute(request).await?;
        if response.status != EXPECTED_STATUS {
            return Err(self.provider_error(response));
        }
        let body = self.parse_json(&response)?;
        self.inner.provider.rate_limit_from_probe(&body)
    }

    /// Merge the provider's fixed headers and auth header into a request.
    fn authorize(&self, mut request: ProviderRequest) -> ProviderRequest {
        for (name, value) in self.inner.provider.request_headers() {
            request.headers.insert(name, value);
        }
        if let Some(auth) = self.inner.provider.auth_header() {
            request
                .headers
                .insert(HEADER_AUTHORIZATION.to_string(), auth.to_string());
        }
        request
    }

    async fn execute(&self, request: ProviderRequest) -> Result<ProviderResponse, SearchError> {
        self.inner
            .http
            .execute(request)
            .await
            .map_err(|e| SearchError::transport(self.provider_name(), e))
    }

    /// Fetch one page and run it through the provider's parse, filter,
    /// and mapping hooks.
    async fn fetch_page(&self, url: &str) -> Result<Page, SearchError> {
        debug!("{}: fetching {}", self.provider_name(), url);
        let request = self.authorize(ProviderRequest::get(url));
        let response = self.execute(request).await?;

        // Quota headers ride on every completed response, error or not.
        if let Some(state) = self.inner.provider.rate_limit_from_headers(&response) {
            self.inner.limiter.record(state);
        }

        if response.status != EXPECTED_STATUS {
            return Err(self.provider_error(response));
        }
        self.parse_page(&response)
    }

    fn parse_page(&self, response: &ProviderResponse) -> Result<Page, SearchError> {
        let body = self.parse_json(response)?;
        let records = body
            .get(self.inner.provider.results_field())
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SearchError::malformed(
                    self.provider_name(),
                    format!("missing `{}` result array", self.inner.provider.results_field()),
                )
            })?;

        let mut hits = Vec::new();
        for raw in records {
            if self.inner.provider.filter_hit(raw) {
                continue;
            }
            hits.push(self.inner.provider.map_hit(raw));
        }
        let cursor = self.inner.provider.next_page_cursor(response, &body);

        Ok(Page { hits, cursor })
    }

    fn parse_json(&self, response: &ProviderResponse) -> Result<Value, SearchError> {
        serde_json::from_str(&response.text)
            .map_err(|e| SearchError::malformed(self.provider_name(), format!("invalid JSON payload: {}", e)))
    }

    fn provider_error(&self, response: ProviderResponse) -> SearchError {
        SearchError::Provider {
            provider: self.provider_name().to_string(),
            status: response.status,
            body: response.text,
        }
    }
}
