//! HTTP client for dispatching provider requests

use crate::providers::{HttpMethod, ProviderRequest, ProviderResponse};
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// Connector wrapper around [`reqwest::Client`].
///
/// Opens one request, attaches headers and body, and hands back status,
/// headers, and the raw payload. The transport handle is scoped to the
/// call: the response is fully consumed (or dropped) before control
/// returns, on every exit path.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Execute a provider request
    pub async fn execute(&self, request: ProviderRequest) -> Result<ProviderResponse, reqwest::Error> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        builder = builder.header("User-Agent", &self.user_agent);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder.send().await?;
        Self::into_provider_response(response).await
    }

    async fn into_provider_response(response: Response) -> Result<ProviderResponse, reqwest::Error> {
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.to_string(), value.to_string());
            }
        }

        let text = response.text().await?;

        Ok(ProviderResponse {
            status,
            headers,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_execute_sends_headers_and_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("Accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("pong")
                    .insert_header("X-Answer", "42"),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request =
            ProviderRequest::get(format!("{}/ping", server.uri())).header("Accept", "application/json");
        let response = client.execute(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text, "pong");
        assert_eq!(response.header("x-answer"), Some("42"));
    }

    #[tokio::test]
    async fn test_execute_posts_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(wiremock::matchers::body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = ProviderRequest::post(format!("{}/token", server.uri())).form(
            HashMap::from([("grant_type".to_string(), "client_credentials".to_string())]),
        );
        let response = client.execute(request).await.unwrap();
        assert!(response.is_success());
    }
}
