use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use http::{Request, Response};
use tokio::time::sleep;
use tracing::{error, warn};

use crate::errors::{HttpStatusError, UnauthorizedError};
use crate::exec::HttpExec;

/// Exponential backoff policy. The defaults produce roughly
/// 10ms, 60ms, 360ms, 2.2s, 10s, 10s, ... between attempts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_secs(10),
            multiplier: 6.0,
            max_retries: 10,
        }
    }
}

/// Middleware that retries a request when it fails in transit or when the
/// response status is in the 5xx range. Authentication failures are
/// permanent and surface immediately; rate-limit errors are retried since
/// the rate-limit layer itself paces the next attempt. Request bodies are
/// owned buffers, so every attempt sends identical bytes.
pub struct RetryExec {
    inner: Arc<dyn HttpExec>,
    config: RetryConfig,
}

impl RetryExec {
    pub fn new(inner: Arc<dyn HttpExec>) -> Self {
        Self::with_config(inner, RetryConfig::default())
    }

    pub fn with_config(inner: Arc<dyn HttpExec>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    async fn try_once(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let resp = self.inner.execute(req).await?;

        if resp.status().is_server_error() {
            let status = resp.status();
            let body = String::from_utf8_lossy(resp.body()).into_owned();
            return Err(HttpStatusError::with_body(status, body).into());
        }

        Ok(resp)
    }
}

#[async_trait]
impl HttpExec for RetryExec {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            match self.try_once(clone_request(&req)).await {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    if is_permanent(&err) || attempt >= self.config.max_retries {
                        error!(
                            attempts = attempt + 1,
                            elapsed_s = started.elapsed().as_secs_f64(),
                            error = %err,
                            "retry was aborted"
                        );
                        return Err(err);
                    }

                    let wait = next_interval(&self.config, attempt);
                    warn!(wait_ms = wait.as_millis() as u64, error = %err, "retrying request");
                    sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn is_permanent(err: &anyhow::Error) -> bool {
    err.downcast_ref::<UnauthorizedError>().is_some()
}

fn next_interval(config: &RetryConfig, attempt: u32) -> Duration {
    let factor = config.multiplier.powi(attempt.min(16) as i32);
    let raw = config.initial_interval.mul_f64(factor);
    raw.min(config.max_interval)
}

fn clone_request(req: &Request<Vec<u8>>) -> Request<Vec<u8>> {
    let mut clone = Request::new(req.body().clone());
    *clone.method_mut() = req.method().clone();
    *clone.uri_mut() = req.uri().clone();
    *clone.headers_mut() = req.headers().clone();
    *clone.version_mut() = req.version();
    clone
}
