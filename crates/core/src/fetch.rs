//! Page fetching.
//!
//! The assembler only depends on the [`PageFetcher`] trait. [`HttpFetcher`]
//! is the reqwest-backed implementation used by the CLI; tests substitute
//! an in-memory fetcher.

use async_trait::async_trait;
use url::Url;

use crate::Result;

#[cfg(feature = "fetch")]
use std::time::Duration;
#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use tracing::warn;
#[cfg(feature = "fetch")]
use crate::QugeError;

/// Request headers as `(name, value)` pairs.
pub type Headers = Vec<(&'static str, String)>;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.8";

/// HTTP client configuration for fetching pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Total attempts per page before giving up.
    pub retries: u32,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 60,
            retries: 3,
            user_agent: "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:45.0) Gecko/20100101 Firefox/45.0".to_string(),
        }
    }
}

/// Something that can turn a URL into page bytes.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw body of `url` with the given request headers.
    async fn fetch(&self, url: &str, headers: &[(&'static str, String)]) -> Result<Vec<u8>>;
}

/// `scheme://host[:port]` of a URL
pub fn origin(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

/// Desktop-browser header set sent with every page request.
///
/// The Referer is the origin of the page being requested.
pub fn browser_headers(url: &Url, config: &FetchConfig) -> Headers {
    vec![
        ("Referer", origin(url)),
        ("User-Agent", config.user_agent.clone()),
        ("Accept", ACCEPT.to_string()),
        ("Accept-Language", ACCEPT_LANGUAGE.to_string()),
        ("Upgrade-Insecure-Requests", "1".to_string()),
    ]
}

#[cfg(feature = "fetch")]
const RETRY_BACKOFF_MS: u64 = 500;

/// reqwest-backed fetcher with a fixed timeout and a bounded retry budget.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(QugeError::HttpError)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_once(&self, url: Url, headers: &[(&'static str, String)]) -> Result<Vec<u8>> {
        let mut request = self.client.get(url.clone());
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                QugeError::Timeout { timeout: self.config.timeout }
            } else {
                QugeError::HttpError(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QugeError::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &[(&'static str, String)]) -> Result<Vec<u8>> {
        let parsed = Url::parse(url).map_err(|e| QugeError::InvalidUrl(e.to_string()))?;
        let attempts = self.config.retries.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch_once(parsed.clone(), headers).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!(url, attempt, error = %e, "fetch failed, retrying");
                    tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64)).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 60);
        assert_eq!(config.retries, 3);
        assert!(config.user_agent.contains("Firefox"));
    }

    #[test]
    fn test_origin() {
        let url = Url::parse("http://www.qu.la/book/1/").unwrap();
        assert_eq!(origin(&url), "http://www.qu.la");

        let url = Url::parse("https://localhost:8080/book/1/").unwrap();
        assert_eq!(origin(&url), "https://localhost:8080");
    }

    #[test]
    fn test_browser_headers() {
        let url = Url::parse("http://www.biqudu.com/43_43821/").unwrap();
        let headers = browser_headers(&url, &FetchConfig::default());
        let names: Vec<_> = headers.iter().map(|(name, _)| *name).collect();

        assert_eq!(
            names,
            ["Referer", "User-Agent", "Accept", "Accept-Language", "Upgrade-Insecure-Requests"]
        );
        assert_eq!(headers[0].1, "http://www.biqudu.com");
        assert_eq!(headers[4].1, "1");
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();
        let result = fetcher.fetch("not-a-url", &[]).await;
        assert!(matches!(result, Err(QugeError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    mod http {
        use super::*;
        use crate::QugeError;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        const UNAVAILABLE: &str = "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        const OK: &str = "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello";

        /// Local server answering the n-th connection with `responses[n]`
        /// (the last one repeats) after `delay`. Returns its URL and a
        /// connection counter.
        async fn serve(responses: &'static [&'static str], delay: Duration) -> (String, Arc<AtomicUsize>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = hits.clone();

            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    let response = responses[n.min(responses.len() - 1)];
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        tokio::time::sleep(delay).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
            });

            (format!("http://{}/book/1/", addr), hits)
        }

        #[tokio::test]
        async fn test_status_error_after_all_attempts() {
            let (url, hits) = serve(&[UNAVAILABLE], Duration::ZERO).await;
            let fetcher = HttpFetcher::new(FetchConfig { timeout: 5, retries: 3, ..Default::default() }).unwrap();

            let result = fetcher.fetch(&url, &[]).await;

            assert!(matches!(result, Err(QugeError::HttpStatus { status: 503, .. })));
            assert_eq!(hits.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_single_attempt_budget() {
            let (url, hits) = serve(&[UNAVAILABLE], Duration::ZERO).await;
            let fetcher = HttpFetcher::new(FetchConfig { timeout: 5, retries: 1, ..Default::default() }).unwrap();

            assert!(fetcher.fetch(&url, &[]).await.is_err());
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_retry_recovers_from_bad_status() {
            let (url, hits) = serve(&[UNAVAILABLE, OK], Duration::ZERO).await;
            let fetcher = HttpFetcher::new(FetchConfig { timeout: 5, retries: 3, ..Default::default() }).unwrap();

            let body = fetcher.fetch(&url, &browser_headers(&Url::parse(&url).unwrap(), fetcher.config())).await;

            assert_eq!(body.unwrap(), b"hello");
            assert_eq!(hits.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_slow_server_times_out() {
            let (url, hits) = serve(&[OK], Duration::from_secs(3)).await;
            let fetcher = HttpFetcher::new(FetchConfig { timeout: 1, retries: 1, ..Default::default() }).unwrap();

            let result = fetcher.fetch(&url, &[]).await;

            assert!(matches!(result, Err(QugeError::Timeout { timeout: 1 })));
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }
    }
}
