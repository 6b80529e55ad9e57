use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use http::{HeaderMap, Request, Response, StatusCode};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::errors::{AbuseRateLimitError, ApiErrorResponse, RateLimitError, UnauthorizedError};
use crate::exec::HttpExec;

/// Wait applied when abuse is signalled without a `Retry-After` header; 60s
/// is what GitHub itself reports for the abuse mechanism.
const DEFAULT_ABUSE_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Middleware implementing the GraphQL API best practices for rate limits
/// and abuse detection. Requests are serialized through a mutex; after a
/// rate limit or abuse response no further request is forwarded until the
/// reported deadline has passed. The middleware never retries; that is the
/// retry layer's job. Each client (with its own token) owns one instance.
pub struct RateLimitExec {
    inner: Arc<dyn HttpExec>,
    locked_until: Mutex<Option<DateTime<Utc>>>,
    default_abuse_sleep: Duration,
}

impl RateLimitExec {
    pub fn new(inner: Arc<dyn HttpExec>) -> Self {
        Self::with_default_abuse_sleep(inner, DEFAULT_ABUSE_RETRY_AFTER)
    }

    pub fn with_default_abuse_sleep(inner: Arc<dyn HttpExec>, default_abuse_sleep: Duration) -> Self {
        Self {
            inner,
            locked_until: Mutex::new(None),
            default_abuse_sleep,
        }
    }
}

#[async_trait]
impl HttpExec for RateLimitExec {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        // The guard is held for the whole round trip so requests on the same
        // token cannot race the server's counters.
        let mut locked_until = self.locked_until.lock().await;

        if let Some(until) = *locked_until {
            let now = Utc::now();
            if until > now {
                info!(until = %until, "rate limit reached, sleeping");
                sleep((until - now).to_std().unwrap_or_default()).await;
            }
        }

        let resp = self.inner.execute(req).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            let message = ApiErrorResponse::parse(resp.body())
                .map(|body| body.message)
                .unwrap_or_else(|| String::from_utf8_lossy(resp.body()).into_owned());
            return Err(UnauthorizedError { message }.into());
        }

        if let Some(err) = as_rate_limit(resp.headers()) {
            *locked_until = Some(err.retry_after);
            return Err(err.into());
        }

        if resp.status() == StatusCode::FORBIDDEN {
            if let Some(err) = as_abuse_rate_limit(&resp, self.default_abuse_sleep) {
                *locked_until = Some(err.retry_after);
                return Err(err.into());
            }
            warn!("403 Forbidden response got, but could not be read as an Abuse Rate Limit response");
        }

        Ok(resp)
    }
}

/// A response with `X-RateLimit-Remaining: 0` and a parseable
/// `X-RateLimit-Reset` means the limit is exhausted until reset + 1s.
fn as_rate_limit(headers: &HeaderMap) -> Option<RateLimitError> {
    let reset = header_int(headers, "X-RateLimit-Reset")?;
    let remaining = header_int(headers, "X-RateLimit-Remaining")?;

    if remaining == 0 {
        let retry_after = Utc.timestamp_opt(reset + 1, 0).single()?;
        return Some(RateLimitError { retry_after });
    }

    None
}

fn as_abuse_rate_limit(
    resp: &Response<Vec<u8>>,
    default_sleep: Duration,
) -> Option<AbuseRateLimitError> {
    if let Some(wait) = retry_after(resp.headers()) {
        return Some(AbuseRateLimitError {
            retry_after: Utc::now() + chrono::Duration::from_std(wait).ok()?,
        });
    }

    let body = ApiErrorResponse::parse(resp.body())?;
    if body.is_abuse_rate_limit() {
        return Some(AbuseRateLimitError {
            retry_after: Utc::now() + chrono::Duration::from_std(default_sleep).ok()?,
        });
    }

    None
}

/// `Retry-After` carries either delay seconds or an HTTP date.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    if let Ok(date) = httpdate::parse_http_date(value) {
        return date.duration_since(std::time::SystemTime::now()).ok();
    }
    None
}

fn header_int(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use super::*;

    struct ScriptedExec {
        responses: std::sync::Mutex<VecDeque<Response<Vec<u8>>>>,
        attempts: AtomicUsize,
    }

    impl ScriptedExec {
        fn new(responses: Vec<Response<Vec<u8>>>) -> Arc<Self> {
            Arc::new(Self {
                responses: std::sync::Mutex::new(responses.into()),
                attempts: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl HttpExec for ScriptedExec {
        async fn execute(&self, _req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted"))
        }
    }

    fn request() -> Request<Vec<u8>> {
        Request::builder()
            .method("POST")
            .uri("https://api.github.com/graphql")
            .body(b"{}".to_vec())
            .unwrap()
    }

    fn response(status: u16, headers: &[(&str, String)], body: &str) -> Response<Vec<u8>> {
        let mut builder = Response::builder().status(status);
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        builder.body(body.as_bytes().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_is_a_typed_error() {
        let exec = ScriptedExec::new(vec![response(
            401,
            &[],
            r#"{"message": "Bad credentials"}"#,
        )]);
        let rt = RateLimitExec::new(exec.clone());

        let err = rt.execute(request()).await.unwrap_err();
        let unauth = err.downcast_ref::<UnauthorizedError>().expect("unauthorized");
        assert_eq!(unauth.message, "Bad credentials");
        assert_eq!(exec.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_rate_limit_locks_until_reset() {
        let reset = Utc::now().timestamp() + 1;
        let exec = ScriptedExec::new(vec![
            response(
                403,
                &[
                    ("X-RateLimit-Remaining", "0".into()),
                    ("X-RateLimit-Reset", reset.to_string()),
                ],
                "",
            ),
            response(200, &[], "{}"),
        ]);
        let rt = RateLimitExec::new(exec);

        let started = Instant::now();
        let err = rt.execute(request()).await.unwrap_err();
        assert!(err.downcast_ref::<RateLimitError>().is_some());
        assert!(started.elapsed() < Duration::from_millis(500), "first call must not sleep");

        let resp = rt.execute(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            started.elapsed() >= Duration::from_secs(1),
            "second call sleeps until reset+1s"
        );
    }

    #[tokio::test]
    async fn abuse_with_retry_after_header() {
        let exec = ScriptedExec::new(vec![
            response(403, &[("Retry-After", "1".into())], ""),
            response(200, &[], "{}"),
        ]);
        let rt = RateLimitExec::new(exec);

        let started = Instant::now();
        let err = rt.execute(request()).await.unwrap_err();
        assert!(err.downcast_ref::<AbuseRateLimitError>().is_some());

        rt.execute(request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn abuse_body_without_header_uses_default_sleep() {
        let exec = ScriptedExec::new(vec![
            response(
                403,
                &[],
                r#"{"message": "You have triggered an abuse detection mechanism."}"#,
            ),
            response(200, &[], "{}"),
        ]);
        let rt = RateLimitExec::with_default_abuse_sleep(exec, Duration::from_millis(300));

        let started = Instant::now();
        let err = rt.execute(request()).await.unwrap_err();
        assert!(err.downcast_ref::<AbuseRateLimitError>().is_some());

        rt.execute(request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn other_forbidden_passes_through_with_body_intact() {
        let body = r#"{"message": "Resource not accessible by integration"}"#;
        let exec = ScriptedExec::new(vec![response(403, &[], body)]);
        let rt = RateLimitExec::new(exec);

        let resp = rt.execute(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(resp.body(), body.as_bytes());
    }

    #[tokio::test]
    async fn remaining_quota_is_not_an_error() {
        let exec = ScriptedExec::new(vec![response(
            200,
            &[
                ("X-RateLimit-Remaining", "4999".into()),
                ("X-RateLimit-Reset", (Utc::now().timestamp() + 3600).to_string()),
            ],
            "{}",
        )]);
        let rt = RateLimitExec::new(exec);

        let resp = rt.execute(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
