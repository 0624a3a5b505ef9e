//! Provider capability set and transport-facing request/response types

use crate::error::SearchError;
use crate::results::{PageCursor, SearchHit};
use crate::search::RateLimitState;
use serde_json::Value;
use std::collections::HashMap;

/// HTTP request to be dispatched on a provider's behalf
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Absolute URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Form-encoded body
    pub form: Option<HashMap<String, String>>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            form: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: HashMap::new(),
            form: None,
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add form data (sets content-type to form-urlencoded)
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.form = Some(data);
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP response handed back by the connector
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
}

impl ProviderResponse {
    /// Look up a header, ignoring name case. The transport normalizes
    /// names to lowercase; adapters keep the documented spellings.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Check if the response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability set every search provider implements.
///
/// The hooks are synchronous projections over already-fetched data; all
/// I/O stays in the generic [`crate::search::SearchClient`]. Providers
/// that need a credential exchange perform it at construction, before an
/// adapter instance exists.
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Short provider tag used in logs and errors
    fn name(&self) -> &str;

    /// Base URL joined with request paths
    fn api_base(&self) -> &str;

    /// `Authorization` header value for an authenticated session
    fn auth_header(&self) -> Option<&str> {
        None
    }

    /// Fixed headers merged into every request beyond auth and user agent
    fn request_headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Name of the JSON field holding a page's result array
    fn results_field(&self) -> &str;

    /// True drops the raw record from the output
    fn filter_hit(&self, raw: &Value) -> bool {
        let _ = raw;
        false
    }

    /// Locator for the next result page, if the provider reports one
    fn next_page_cursor(&self, response: &ProviderResponse, body: &Value) -> Option<PageCursor>;

    /// Quota reported on the response itself, when the provider supports
    /// header-based extraction
    fn rate_limit_from_headers(&self, response: &ProviderResponse) -> Option<RateLimitState> {
        let _ = response;
        None
    }

    /// Request for the out-of-band quota endpoint, which does not consume
    /// search quota
    fn rate_limit_probe(&self) -> ProviderRequest;

    /// Extract the search quota from a probe response body
    fn rate_limit_from_probe(&self, body: &Value) -> Result<RateLimitState, SearchError>;

    /// Project a raw record into a [`SearchHit`]. Missing optional fields
    /// become empty values; this never fails.
    fn map_hit(&self, raw: &Value) -> SearchHit;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = ProviderRequest::get("https://api.example.com/search")
            .header("Accept", "application/json");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.headers.get("Accept").unwrap(), "application/json");
        assert!(request.form.is_none());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = ProviderResponse {
            status: 200,
            headers: HashMap::from([("x-ratelimit-remaining".to_string(), "9".to_string())]),
            text: String::new(),
        };

        assert_eq!(response.header("X-RateLimit-Remaining"), Some("9"));
        assert_eq!(response.header("Link"), None);
        assert!(response.is_success());
    }
}
