//! Page fetching with a bounded, fixed-delay retry loop.
//!
//! # Architecture
//!
//! - [`Fetch`]: core trait, one async GET returning the page body
//! - [`HttpFetcher`]: `reqwest` implementation with the site's headers and timeout
//! - [`RetryFetch`]: decorator that retries any [`Fetch`] implementation
//!
//! # Retry Strategy
//!
//! - Fixed number of attempts per URL (3 by default)
//! - Fixed delay between attempts, no growth and no jitter
//! - A timed-out attempt or a non-success status counts as a failed attempt
//!
//! Pacing between *different* pages is the caller's job; see [`crate::scrape`].

use crate::config::Config;
use crate::error::{AppError, FetchError};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Something that can turn a URL into page markup.
pub trait Fetch {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain HTTP fetcher. One attempt per call.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client carrying the configured user agent, headers and timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (ACCEPT, config.accept.as_str()),
            (ACCEPT_LANGUAGE, config.accept_language.as_str()),
        ] {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(e) => warn!(header = %name, error = %e, "Skipping invalid header value"),
            }
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, e))?;
        let response = response
            .error_for_status()
            .map_err(|e| FetchError::new(url, e))?;
        let body = response.text().await.map_err(|e| FetchError::new(url, e))?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Wrapper that retries any [`Fetch`] implementation a fixed number of times.
pub struct RetryFetch<T> {
    inner: T,
    max_attempts: usize,
    delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: Fetch,
{
    /// `max_attempts` counts the first try; zero is treated as one.
    pub fn new(inner: T, max_attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish()
    }
}

impl<T> Fetch for RetryFetch<T>
where
    T: Fetch,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    if attempt >= self.max_attempts {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_total = t0.elapsed().as_millis() as u64,
                            error = %e.last_error,
                            "fetch exhausted retries"
                        );
                        return Err(FetchError::new(url, e.last_error));
                    }
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        delay = ?self.delay,
                        error = %e.last_error,
                        "fetch attempt failed; retrying"
                    );
                    sleep(self.delay).await;
                }
            }
        }
    }
}

/// The fetcher used by the CLI: HTTP with the configured retry policy.
pub fn http_with_retry(config: &Config) -> Result<RetryFetch<HttpFetcher>, AppError> {
    let http = HttpFetcher::new(config)?;
    Ok(RetryFetch::new(http, config.max_attempts, config.retry_delay))
}
