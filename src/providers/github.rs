//! GitHub repository search provider
//!
//! Uses GitHub's official repository search API. Pagination arrives in
//! the `Link` response header and quota in the `X-RateLimit-*` headers.

use super::{Provider, ProviderRequest, ProviderResponse};
use crate::error::SearchError;
use crate::results::{PageCursor, SearchHit};
use crate::search::RateLimitState;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use url::Url;

const PROVIDER_NAME: &str = "github";
const BASE_API_URL: &str = "https://api.github.com/";
/// https://developer.github.com/v3/#current-version
const API_VERSION: &str = "application/vnd.github.v3+json";
/// Repository search path; the escaped query is appended to it.
pub const SEARCH_REPOSITORIES: &str = "search/repositories?sort=pushed&order=desc&q=";
/// https://developer.github.com/v3/search/#rate-limit
const RATE_LIMIT_PATH: &str = "rate_limit";

const HEADER_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
const HEADER_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";
const HEADER_SEARCH_LINK: &str = "Link";

static NEXT_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<(.*?)>; rel="next""#).unwrap());

/// GitHub repository search adapter
#[derive(Debug)]
pub struct GitHub {
    api_base: String,
    auth_header: Option<String>,
}

impl GitHub {
    /// Unauthenticated session (lower quota, no credentials required)
    pub fn new() -> Self {
        Self {
            api_base: BASE_API_URL.to_string(),
            auth_header: None,
        }
    }

    /// Basic-auth session for the given account
    pub fn with_credentials(username: &str, password: &str) -> Self {
        Self {
            api_base: BASE_API_URL.to_string(),
            auth_header: Some(Self::encode_credentials(username, password)),
        }
    }

    /// Basic-auth header value for a username/password pair
    pub fn encode_credentials(username: &str, password: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
    }
}

impl Default for GitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for GitHub {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn auth_header(&self) -> Option<&str> {
        self.auth_header.as_deref()
    }

    fn request_headers(&self) -> HashMap<String, String> {
        HashMap::from([("Accept".to_string(), API_VERSION.to_string())])
    }

    fn results_field(&self) -> &str {
        "items"
    }

    fn next_page_cursor(&self, response: &ProviderResponse, _body: &Value) -> Option<PageCursor> {
        let links = response.header(HEADER_SEARCH_LINK)?;
        let captures = NEXT_LINK.captures(links)?;
        let url = Url::parse(&captures[1]).ok()?;
        Some(PageCursor::new(String::from(url)))
    }

    fn rate_limit_from_headers(&self, response: &ProviderResponse) -> Option<RateLimitState> {
        let remaining = response.header(HEADER_RATE_LIMIT_REMAINING)?.parse().ok()?;
        let reset_at = response.header(HEADER_RATE_LIMIT_RESET)?.parse().ok()?;
        Some(RateLimitState::new(remaining, reset_at))
    }

    fn rate_limit_probe(&self) -> ProviderRequest {
        ProviderRequest::get(format!("{}{}", self.api_base, RATE_LIMIT_PATH))
    }

    fn rate_limit_from_probe(&self, body: &Value) -> Result<RateLimitState, SearchError> {
        let search = body
            .get("resources")
            .and_then(|r| r.get("search"))
            .ok_or_else(|| {
                SearchError::malformed(PROVIDER_NAME, "rate limit response missing resources.search")
            })?;
        let remaining = search
            .get("remaining")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::malformed(PROVIDER_NAME, "rate limit response missing remaining"))?;
        let reset_at = search
            .get("reset")
            .and_then(Value::as_i64)
            .ok_or_else(|| SearchError::malformed(PROVIDER_NAME, "rate limit response missing reset"))?;
        Ok(RateLimitState::new(remaining, reset_at))
    }

    fn map_hit(&self, raw: &Value) -> SearchHit {
        let text = |key: &str| -> String {
            raw.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let name = text("full_name");
        let description = text("description");
        let summary = match raw.get("homepage").and_then(Value::as_str) {
            Some(homepage) if !homepage.is_empty() => format!("{} ({})", description, homepage),
            _ => description,
        };

        let mut fields = Map::new();
        fields.insert("project_name".to_string(), Value::String(text("name")));
        fields.insert("project_full_name".to_string(), Value::String(name.clone()));
        fields.insert("github_address".to_string(), Value::String(text("html_url")));
        fields.insert("summary".to_string(), Value::String(summary.clone()));

        let rendering = format!(
            "Repository: {} ({})\nProject: {}\n{}",
            name,
            text("html_url"),
            text("name"),
            summary
        );

        SearchHit::new(name, fields, rendering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with_headers(headers: &[(&str, &str)]) -> ProviderResponse {
        ProviderResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: String::new(),
        }
    }

    #[test]
    fn test_encode_credentials() {
        assert_eq!(GitHub::encode_credentials("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_next_page_cursor_from_link_header() {
        let github = GitHub::new();
        let response = response_with_headers(&[(
            "link",
            "<https://api.github.com/search/repositories?q=reactive&page=2>; rel=\"next\", \
             <https://api.github.com/search/repositories?q=reactive&page=34>; rel=\"last\"",
        )]);

        let cursor = github.next_page_cursor(&response, &json!({})).unwrap();
        assert_eq!(
            cursor.as_str(),
            "https://api.github.com/search/repositories?q=reactive&page=2"
        );
    }

    #[test]
    fn test_no_cursor_without_next_relation() {
        let github = GitHub::new();
        let last_only = response_with_headers(&[(
            "link",
            "<https://api.github.com/search/repositories?q=reactive&page=34>; rel=\"last\"",
        )]);

        assert!(github.next_page_cursor(&last_only, &json!({})).is_none());
        assert!(github
            .next_page_cursor(&response_with_headers(&[]), &json!({}))
            .is_none());
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let github = GitHub::new();
        let response = response_with_headers(&[
            ("x-ratelimit-remaining", "9"),
            ("x-ratelimit-reset", "1700000000"),
        ]);

        let state = github.rate_limit_from_headers(&response).unwrap();
        assert_eq!(state.remaining, 9);
        assert_eq!(state.reset_at, Some(1700000000));
        assert!(github
            .rate_limit_from_headers(&response_with_headers(&[]))
            .is_none());
    }

    #[test]
    fn test_rate_limit_from_probe() {
        let github = GitHub::new();
        let body = json!({
            "resources": { "search": { "remaining": 28, "reset": 1700000123 } }
        });

        let state = github.rate_limit_from_probe(&body).unwrap();
        assert_eq!(state.remaining, 28);
        assert_eq!(state.reset_at, Some(1700000123));

        let err = github.rate_limit_from_probe(&json!({})).unwrap_err();
        assert!(matches!(err, SearchError::MalformedResponse { .. }));
    }

    #[test]
    fn test_map_hit_projects_repository_fields() {
        let github = GitHub::new();
        let raw = json!({
            "name": "buzz",
            "full_name": "acme/buzz",
            "html_url": "https://github.com/acme/buzz",
            "description": "A buzz generator",
            "homepage": "https://buzz.acme.dev"
        });

        let hit = github.map_hit(&raw);
        assert_eq!(hit.name(), "acme/buzz");
        assert_eq!(hit.field("project_name").unwrap(), "buzz");
        assert_eq!(
            hit.field("summary").unwrap(),
            "A buzz generator (https://buzz.acme.dev)"
        );
        assert_eq!(
            hit.to_string(),
            "Repository: acme/buzz (https://github.com/acme/buzz)\nProject: buzz\nA buzz generator (https://buzz.acme.dev)"
        );
    }

    #[test]
    fn test_map_hit_tolerates_missing_fields() {
        let github = GitHub::new();
        let hit = github.map_hit(&json!({ "full_name": "acme/bare" }));

        assert_eq!(hit.name(), "acme/bare");
        assert_eq!(hit.field("summary").unwrap(), "");
        assert_eq!(hit.field("github_address").unwrap(), "");
    }

    #[test]
    fn test_never_filters_repositories() {
        let github = GitHub::new();
        assert!(!github.filter_hit(&json!({ "full_name": "acme/buzz" })));
    }
}
