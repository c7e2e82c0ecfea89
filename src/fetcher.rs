use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{error, warn};

use crate::parser::PageDocument;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("gave up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

/// Bounded retry with optional exponential backoff.
///
/// A zero `base_delay` retries back-to-back, which is how the listing has
/// always been scraped. Setting it turns on doubling delays capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::ZERO,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds or `max_attempts` is reached.
    /// `op` receives the 1-based attempt number. Each failure is logged.
    pub fn run<T, F>(&self, url: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Result<T, FetchError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt) {
                Ok(v) => return Ok(v),
                Err(e) => {
                    warn!("Attempt {} failed for {}: {}", attempt, url, e);
                    if attempt >= attempts {
                        error!("Failed to fetch {} after {} attempts.", url, attempts);
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts,
                            last: Box::new(e),
                        });
                    }
                }
            }

            let backoff = self.delay_after(attempt);
            if !backoff.is_zero() {
                thread::sleep(backoff);
            }
            attempt += 1;
        }
    }
}

/// Anything that can turn a URL into a parsed listing page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<PageDocument, FetchError>;
}

/// Blocking HTTP fetcher with bounded retries.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(HttpFetcher { client, policy })
    }

    fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        Ok(body)
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<PageDocument, FetchError> {
        let body = self.policy.run(url, |_| self.get_once(url))?;
        Ok(PageDocument::parse(&body))
    }
}

// ── Tests ──
