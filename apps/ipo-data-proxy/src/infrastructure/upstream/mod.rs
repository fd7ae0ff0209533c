//! Upstream Market Data Client
//!
//! `reqwest` implementation of [`MarketDataPort`] for a Finnhub-style REST
//! API: `GET {base_url}{endpoint}?symbol=..&token=..`.

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{
    MarketDataPort, UpstreamError, UpstreamRequest, UpstreamResponse,
};
use crate::infrastructure::config::UpstreamSettings;

/// HTTP client for the upstream provider.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client from settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for an endpoint.
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }
}

#[async_trait]
impl MarketDataPort for UpstreamClient {
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(&request.endpoint);

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(2);
        if let Some(symbol) = request.symbol.as_deref() {
            query.push(("symbol", symbol));
        }
        query.push(("token", request.api_key.as_str()));

        let http_request = self
            .client
            .get(&url)
            .query(&query)
            .build()
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;

        tracing::debug!(url = %url, "Calling upstream");

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        Ok(UpstreamResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> UpstreamClient {
        UpstreamClient::new(&UpstreamSettings {
            base_url: server.uri(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn url_join_handles_slashes() {
        let client = UpstreamClient::new(&UpstreamSettings {
            base_url: "https://finnhub.io/api/v1/".to_string(),
            timeout: None,
        })
        .unwrap();
        assert_eq!(
            client.url_for("/calendar/ipo"),
            "https://finnhub.io/api/v1/calendar/ipo"
        );
        assert_eq!(client.url_for("quote"), "https://finnhub.io/api/v1/quote");
    }

    #[tokio::test]
    async fn sends_symbol_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", "RDDT"))
            .and(query_param("token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"c":44.1}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .fetch(UpstreamRequest {
                endpoint: "/quote".to_string(),
                symbol: Some("RDDT".to_string()),
                api_key: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"c":44.1}"#);
    }

    #[tokio::test]
    async fn omits_symbol_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar/ipo"))
            .and(query_param_is_missing("symbol"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .fetch(UpstreamRequest {
                endpoint: "/calendar/ipo".to_string(),
                symbol: None,
                api_key: "secret".to_string(),
            })
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn non_success_status_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .fetch(UpstreamRequest {
                endpoint: "/quote".to_string(),
                symbol: None,
                api_key: "secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.status, 429);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let client = UpstreamClient::new(&UpstreamSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: None,
        })
        .unwrap();

        let err = client
            .fetch(UpstreamRequest {
                endpoint: "/quote".to_string(),
                symbol: None,
                api_key: "secret".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
