use async_trait::async_trait;
use log::warn;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

use super::transport::{Transport, TransportError, TransportResponse};

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Wraps another transport and retries transient failures.
///
/// Timeouts, connection failures and HTTP 429/5xx responses are retried up to
/// `max_retries` extra times with exponential backoff. Everything else goes
/// straight back to the caller. Once retries run out, the last error or
/// response is returned unchanged.
pub struct RetryTransport {
    inner: Arc<dyn Transport>,
    max_retries: u32,
    base_delay: Duration,
}

impl RetryTransport {
    pub fn new(inner: Arc<dyn Transport>, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u32 << attempt.min(16);
        self.base_delay.saturating_mul(factor).min(MAX_DELAY)
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

#[async_trait]
impl Transport for RetryTransport {
    async fn post(&self, url: Url, body: String) -> Result<TransportResponse, TransportError> {
        let mut attempt = 0;
        loop {
            let result = self.inner.post(url.clone(), body.clone()).await;
            let retry = match &result {
                Ok(response) => is_retryable_status(response.status),
                Err(err) => err.is_retryable(),
            };
            if !retry || attempt >= self.max_retries {
                return result;
            }

            let delay = self.backoff(attempt);
            match &result {
                Ok(response) => warn!(
                    "POST {} answered HTTP {} (attempt {}/{}), retrying in {:?}",
                    url.path(),
                    response.status,
                    attempt + 1,
                    self.max_retries + 1,
                    delay
                ),
                Err(err) => warn!(
                    "POST {} failed (attempt {}/{}), retrying in {:?}: {}",
                    url.path(),
                    attempt + 1,
                    self.max_retries + 1,
                    delay,
                    err
                ),
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
