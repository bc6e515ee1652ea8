// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Direct HTTP acquisition wrapping reqwest.
//!
//! One GET per call: no retries and no backoff. Timeout, user agent and
//! headers come from the site configuration of the provider being tried.

use crate::config::{SiteConfig, DEFAULT_USER_AGENT};
use crate::types::{EngineError, EngineResult};
use reqwest::header::{ACCEPT_ENCODING, USER_AGENT};
use std::time::Duration;
use tracing::debug;

/// Used only when a request somehow carries no timeout of its own.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared HTTP client for direct acquisition.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// GET `url` under `config`; any non-2xx status is a failure.
    pub async fn fetch(&self, url: &str, config: &SiteConfig) -> EngineResult<String> {
        let mut request = self
            .client
            .get(url)
            .timeout(config.timeout)
            .header(USER_AGENT, config.user_agent.as_str());

        // Content decoding is negotiated by the client itself.
        for (name, value) in config
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(ACCEPT_ENCODING.as_str()))
        {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("timed out after {}ms", config.timeout.as_millis())
            } else {
                e.to_string()
            };
            EngineError::acquisition(url, reason)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::acquisition(url, format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| EngineError::acquisition(url, format!("failed to read body: {e}")))?;
        debug!(url, status = status.as_u16(), bytes = body.len(), "fetched page");
        Ok(body)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, headers, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> SiteConfig {
        SiteConfig::builder()
            .header("Accept-Language", "tr-TR,tr;q=0.9")
            .header("Accept-Encoding", "identity")
            .user_agent("PriceTest/1.0")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_site_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/1"))
            .and(header("user-agent", "PriceTest/1.0"))
            .and(headers("accept-language", vec!["tr-TR", "tr;q=0.9"]))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = HttpFetcher::new()
            .fetch(&format!("{}/p/1", server.uri()), &config())
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_non_2xx_is_acquisition_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/p/1", server.uri());
        let err = HttpFetcher::new().fetch(&url, &config()).await.unwrap_err();
        assert_eq!(err.kind(), "E_ACQUISITION_FAILED");
        assert!(err.to_string().contains("HTTP 503"));
        assert!(err.to_string().contains(&url));
    }

    #[tokio::test]
    async fn test_timeout_is_acquisition_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let err = HttpFetcher::new()
            .fetch(&format!("{}/slow", server.uri()), &config())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "E_ACQUISITION_FAILED");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let err = HttpFetcher::new()
            .fetch("http://127.0.0.1:9/p/1", &config())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "E_ACQUISITION_FAILED");
    }
}
