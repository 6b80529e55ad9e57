use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use http::{Request, Response};
use tracing::debug;

#[async_trait]
pub trait HttpExec: Send + Sync {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .expect("reqwest client");
        Self { client }
    }
}

#[async_trait]
impl HttpExec for ReqwestExecutor {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let (parts, body) = req.into_parts();
        let mut builder = self.client.request(parts.method, parts.uri.to_string());
        builder = builder.headers(parts.headers);
        let resp = builder.body(body).send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await?;
        let mut builder = Response::builder().status(status);
        *builder.headers_mut().expect("response builder") = headers;
        Ok(builder.body(bytes.to_vec())?)
    }
}

/// Debug-level request/response logger, enabled with `log_http`.
pub struct LoggingExec {
    inner: Arc<dyn HttpExec>,
}

impl LoggingExec {
    pub fn new(inner: Arc<dyn HttpExec>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HttpExec for LoggingExec {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let started = Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();
        let request_body = String::from_utf8_lossy(req.body()).into_owned();

        let response = self.inner.execute(req).await?;

        debug!(
            %method,
            %uri,
            status = %response.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            request_body = %request_body,
            response_body = %String::from_utf8_lossy(response.body()),
            "HTTP response"
        );

        Ok(response)
    }
}
