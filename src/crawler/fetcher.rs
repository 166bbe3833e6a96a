//! Page-fetch collaborator
//!
//! The crawl loop only needs one operation from the transport: turn a URL
//! into HTML or a failure. Everything else (status handling, redirects,
//! browser automation) is the transport's business.

use reqwest::Client;
use std::time::Duration;

/// The fetch collaborator consumed by the crawl loop
///
/// `None` signals failure; any `Some` body is treated as fetched content
/// regardless of HTTP status.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Builds the HTTP client used by [`HttpFetcher`]
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("listharvest/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    tracing::debug!("HTTP {} for {}", status, url);
                }
                match response.text().await {
                    Ok(body) => Some(body),
                    Err(e) => {
                        tracing::warn!("Failed to read body for {}: {}", url, e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_returns_body_regardless_of_status() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<html>gone</html>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher.fetch(&format!("{}/missing", server.uri())).await;

        assert_eq!(body.as_deref(), Some("<html>gone</html>"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_none() {
        let fetcher = HttpFetcher::new().unwrap();
        // Nothing listens on this port
        let body = fetcher.fetch("http://127.0.0.1:1/nope").await;
        assert!(body.is_none());
    }
}
