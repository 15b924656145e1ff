//! HTTP client with request pacing for rtve.es
//!
//! Every request waits on a shared [`RateLimiter`] so that consecutive
//! requests are at least one download delay apart. Politeness settings are
//! passed in through [`ClientConfig`]; nothing here is process-wide.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER};

use crate::error::{RtveError, Result};

/// Default User-Agent identifying the crawler
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; DiscopolisBot/1.0)";

/// Default Accept-Language header for Spanish content
const DEFAULT_ACCEPT_LANGUAGE: &str = "es-ES,es;q=0.9";

/// Default delay between consecutive requests
const DEFAULT_DOWNLOAD_DELAY: Duration = Duration::from_secs(3);

/// Origin sent with API requests
const API_ORIGIN: &str = "https://www.rtve.es";

/// Referer sent with API requests
const API_REFERER: &str = "https://www.rtve.es/play/radio/";

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a rate limiter that waits `min_interval` between requests
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use rtve_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::with_interval(Duration::from_millis(500));
    /// assert_eq!(limiter.min_interval(), Duration::from_millis(500));
    /// ```
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Acquire permission to make a request
    ///
    /// The first call returns immediately; later calls wait until
    /// `min_interval` has passed since the previous one.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the RTVE HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Accept-Language header sent with every request
    pub accept_language: String,
    /// Minimum delay between consecutive requests (default: 3s)
    pub download_delay: Duration,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            download_delay: DEFAULT_DOWNLOAD_DELAY,
            timeout_secs: 30,
        }
    }
}

/// HTTP client for rtve.es pages and the RTVE API
pub struct RtveClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
}

impl RtveClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `RtveError::InvalidConfig` - Accept-Language is not a valid header value
    /// - `RtveError::HttpError` - The HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|_| {
                RtveError::InvalidConfig(format!(
                    "invalid Accept-Language header: {}",
                    config.accept_language
                ))
            })?,
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::with_interval(config.download_delay);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Fetch an HTML page
    ///
    /// # Errors
    /// - `RtveError::HttpError` - Network or HTTP error
    /// - `RtveError::RateLimited` - Server returned 429
    /// - `RtveError::NotFound` - Server returned 404
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.get(url, HeaderMap::new()).await
    }

    /// Fetch a JSON document from the RTVE API
    ///
    /// Sends the headers the API expects from the web player. The body is
    /// returned undecoded so that callers decide how to handle bad JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<String> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static(API_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(API_REFERER));
        self.get(url, headers).await
    }

    async fn get(&self, url: &str, headers: HeaderMap) -> Result<String> {
        // Wait for rate limiter before making request
        self.rate_limiter.acquire().await;

        tracing::debug!(url, "GET");
        let response = self.client.get(url).headers(headers).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RtveError::NotFound(url.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RtveError::RateLimited);
        }

        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
