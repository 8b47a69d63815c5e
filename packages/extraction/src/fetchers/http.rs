//! HTTP-based fetcher implementation.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout, connect through body
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Redirects followed before giving up
    pub max_redirects: usize,
    /// Largest response body accepted, in bytes
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "ScrapeJobsBot/1.0".to_string(),
            max_redirects: 5,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Fetcher that performs a single HTTP GET per call.
///
/// # Example
///
/// ```rust,ignore
/// use extraction::fetchers::{FetchConfig, HttpFetcher};
///
/// let fetcher = HttpFetcher::new(FetchConfig::default())?;
/// let html = fetcher.fetch("https://example.com").await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher.
    pub fn new(config: FetchConfig) -> FetchResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Client(Box::new(e)))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn parse_url(url: &str) -> FetchResult<Url> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
            _ => Err(FetchError::InvalidUrl {
                url: url.to_string(),
            }),
        }
    }

    /// Read the body chunk by chunk, stopping once it passes the cap.
    async fn read_body(&self, url: &str, mut response: reqwest::Response) -> FetchResult<String> {
        let too_large = || {
            warn!(url = %url, limit = self.max_body_bytes, "response body too large");
            FetchError::BodyTooLarge {
                url: url.to_string(),
                limit: self.max_body_bytes,
            }
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::map_request_error(url, e))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn map_request_error(url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Http(Box::new(e))
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        let parsed = Self::parse_url(url)?;

        debug!(url = %url, "HTTP fetch starting");
        let response = self.client.get(parsed).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            Self::map_request_error(url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "HTTP error status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = self.read_body(url, response).await?;

        debug!(url = %url, content_length = body.len(), "HTTP fetch completed");
        Ok(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a random local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/page")
    }

    fn local_fetcher(timeout: Duration) -> HttpFetcher {
        local_fetcher_with(FetchConfig::default(), timeout)
    }

    fn local_fetcher_with(config: FetchConfig, timeout: Duration) -> HttpFetcher {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        HttpFetcher::new(config).unwrap().with_client(client)
    }

    #[test]
    fn test_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.user_agent, "ScrapeJobsBot/1.0");
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_declared_oversized_body_is_rejected() {
        let url = serve_once("HTTP/1.1 200 OK", "<p>0123456789</p>").await;
        let fetcher =
            local_fetcher_with(FetchConfig::default().with_max_body_bytes(8), Duration::from_secs(5));

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::BodyTooLarge { limit: 8, .. }));
    }

    #[tokio::test]
    async fn test_undeclared_oversized_body_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // No Content-Length: the body runs until the connection closes
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let body = "x".repeat(4096);
            let response = format!("HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n{body}");
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        let fetcher = local_fetcher_with(
            FetchConfig::default().with_max_body_bytes(1024),
            Duration::from_secs(5),
        );
        let err = fetcher.fetch(&format!("http://{addr}/big")).await.unwrap_err();
        assert!(matches!(err, FetchError::BodyTooLarge { limit: 1024, .. }));
    }

    #[tokio::test]
    async fn test_body_at_the_limit_is_accepted() {
        let url = serve_once("HTTP/1.1 200 OK", "12345678").await;
        let fetcher =
            local_fetcher_with(FetchConfig::default().with_max_body_bytes(8), Duration::from_secs(5));
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "12345678");
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let url = serve_once("HTTP/1.1 200 OK", "<div class=\"header\">Hi</div>").await;
        let body = local_fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();
        assert_eq!(body, "<div class=\"header\">Hi</div>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let url = serve_once("HTTP/1.1 404 Not Found", "missing").await;
        let err = local_fetcher(Duration::from_secs(5))
            .fetch(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering.
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let err = local_fetcher(Duration::from_millis(200))
            .fetch(&format!("http://{addr}/slow"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_urls() {
        let fetcher = local_fetcher(Duration::from_secs(1));

        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));

        let err = fetcher.fetch("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
