//! Twitter post search provider
//!
//! Uses the v1.1 standard search API with application-only OAuth2 auth.
//! Pagination arrives as a `search_metadata.next_results` token in the
//! body and quota in the `X-Rate-Limit-*` headers.

use super::{Provider, ProviderRequest, ProviderResponse};
use crate::error::SearchError;
use crate::network::HttpClient;
use crate::results::{PageCursor, SearchHit};
use crate::search::RateLimitState;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

const PROVIDER_NAME: &str = "twitter";
const BASE_API_URL: &str = "https://api.twitter.com/1.1/";
const SEARCH_POSTS_PATH: &str = "search/tweets.json";
/// Recent-post search path at the maximum page size; the escaped query is
/// appended to it.
pub const SEARCH_RECENT_POSTS: &str = "search/tweets.json?result_type=recent&count=100&q=";

/// https://dev.twitter.com/oauth/application-only
const BASE_OAUTH2_API_URL: &str = "https://api.twitter.com/";
const OAUTH2_TOKEN_PATH: &str = "oauth2/token";
const OAUTH2_GRANT_TYPE: &str = "client_credentials";
const OAUTH2_TOKEN_TYPE: &str = "Bearer";

/// https://dev.twitter.com/rest/public/rate-limiting
const HEADER_RATE_LIMIT_REMAINING: &str = "X-Rate-Limit-Remaining";
const HEADER_RATE_LIMIT_RESET: &str = "X-Rate-Limit-Reset";
const RATE_LIMIT_PATH: &str = "application/rate_limit_status.json?resources=search";

const HOST: &str = "api.twitter.com";

/// Twitter post search adapter.
///
/// Construction performs the OAuth2 token exchange; the session that
/// comes out of it carries a bearer token and the API base all further
/// requests resolve against.
#[derive(Debug)]
pub struct Twitter {
    api_base: String,
    auth_header: String,
}

impl Twitter {
    /// Exchange consumer credentials for an application-only bearer
    /// token.
    ///
    /// An unexpected token type in the response may be a security problem
    /// or an API change; it aborts construction instead of being retried.
    pub async fn connect(http: &HttpClient, key: &str, secret: &str) -> Result<Self, SearchError> {
        Self::connect_with_base(http, BASE_OAUTH2_API_URL, BASE_API_URL, key, secret).await
    }

    async fn connect_with_base(
        http: &HttpClient,
        oauth_base: &str,
        api_base: &str,
        key: &str,
        secret: &str,
    ) -> Result<Self, SearchError> {
        let request = ProviderRequest::post(format!("{}{}", oauth_base, OAUTH2_TOKEN_PATH))
            .header("Authorization", Self::encode_credentials(key, secret))
            .header("Host", HOST)
            .form(HashMap::from([(
                "grant_type".to_string(),
                OAUTH2_GRANT_TYPE.to_string(),
            )]));

        let response = http
            .execute(request)
            .await
            .map_err(|e| SearchError::transport(PROVIDER_NAME, e))?;
        if response.status != 200 {
            return Err(SearchError::Provider {
                provider: PROVIDER_NAME.to_string(),
                status: response.status,
                body: response.text,
            });
        }

        let token: Value = response.json().map_err(|e| {
            SearchError::malformed(PROVIDER_NAME, format!("invalid OAuth2 token payload: {}", e))
        })?;
        let token_type = token
            .get("token_type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !token_type.eq_ignore_ascii_case(OAUTH2_TOKEN_TYPE) {
            return Err(SearchError::Authentication {
                provider: PROVIDER_NAME.to_string(),
                detail: format!("unexpected OAuth2 token type {:?}", token_type),
            });
        }
        let access_token = token
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SearchError::malformed(PROVIDER_NAME, "token response missing access_token")
            })?;

        info!("twitter OAuth2 token exchange complete");
        Ok(Self {
            api_base: api_base.to_string(),
            auth_header: format!("{} {}", OAUTH2_TOKEN_TYPE, access_token),
        })
    }

    /// Basic-auth header value over the RFC 1738 encoded consumer
    /// credentials, per the application-only auth flow.
    pub fn encode_credentials(key: &str, secret: &str) -> String {
        let credentials = format!(
            "{}:{}",
            urlencoding::encode(key),
            urlencoding::encode(secret)
        );
        format!("Basic {}", BASE64.encode(credentials))
    }
}

impl Provider for Twitter {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn auth_header(&self) -> Option<&str> {
        Some(&self.auth_header)
    }

    fn request_headers(&self) -> HashMap<String, String> {
        HashMap::from([("Host".to_string(), HOST.to_string())])
    }

    fn results_field(&self) -> &str {
        "statuses"
    }

    /// Retweets carry the original post under `retweeted_status`; drop
    /// them so each post appears once.
    fn filter_hit(&self, raw: &Value) -> bool {
        raw.get("retweeted_status").is_some()
    }

    fn next_page_cursor(&self, _response: &ProviderResponse, body: &Value) -> Option<PageCursor> {
        let next = body
            .get("search_metadata")?
            .get("next_results")?
            .as_str()?;
        Some(PageCursor::new(format!(
            "{}{}{}",
            self.api_base, SEARCH_POSTS_PATH, next
        )))
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
        let search_posts = body
            .get("resources")
            .and_then(|r| r.get("search"))
            .and_then(|s| s.get("/search/tweets"))
            .ok_or_else(|| {
                SearchError::malformed(
                    PROVIDER_NAME,
                    "rate limit response missing resources.search./search/tweets",
                )
            })?;
        let remaining = search_posts
            .get("remaining")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::malformed(PROVIDER_NAME, "rate limit response missing remaining"))?;
        let reset_at = search_posts
            .get("reset")
            .and_then(Value::as_i64)
            .ok_or_else(|| SearchError::malformed(PROVIDER_NAME, "rate limit response missing reset"))?;
        Ok(RateLimitState::new(remaining, reset_at))
    }

    /// The whole raw post is the payload; the identifying name is its
    /// string id.
    fn map_hit(&self, raw: &Value) -> SearchHit {
        let name = raw
            .get("id_str")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let fields = raw.as_object().cloned().unwrap_or_default();
        SearchHit::new(name, fields, raw.to_string())
    }
}
