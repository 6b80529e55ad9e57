use std::sync::Arc;

use anyhow::{anyhow, Result};
use http::{header, Request};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use gh_transport::{HttpExec, HttpStatusError};

use crate::connection::{Connection, ConnectionDesc};
use crate::queries;

/// Returned when the server reports the requested entity as missing, either
/// through a `NOT_FOUND` error entry or a null object in `data`.
#[derive(Debug, thiserror::Error)]
#[error("not found: {message}")]
pub struct NotFoundError {
    pub message: String,
}

/// Typed query executor over a transport chain. Each client carries one
/// bearer token; per-token rate-limit state lives in the chain itself.
pub struct GraphqlClient {
    exec: Arc<dyn HttpExec>,
    endpoint: String,
    token: String,
    user_agent: String,
}

impl GraphqlClient {
    pub fn new(
        exec: Arc<dyn HttpExec>,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            exec,
            endpoint: endpoint.into(),
            token: token.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Executes a query document and returns the `data` value, mapping the
    /// `errors` array to a failure.
    pub async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        let payload = json!({
            "query": query,
            "variables": variables,
        });

        let request = Request::builder()
            .method("POST")
            .uri(self.endpoint.as_str())
            .header(header::AUTHORIZATION, format!("bearer {}", self.token))
            .header(header::USER_AGENT, self.user_agent.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/vnd.github+json")
            .body(serde_json::to_vec(&payload)?)?;

        let response = self.exec.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = String::from_utf8_lossy(response.body()).into_owned();
            return Err(HttpStatusError::with_body(status, body).into());
        }

        let value: Value = serde_json::from_slice(response.body())?;
        if let Some(errors) = value.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(map_graphql_errors(errors));
            }
        }

        value
            .get("data")
            .cloned()
            .ok_or_else(|| anyhow!("missing data in GraphQL response"))
    }

    /// Executes a query and deserializes the value found at `path` inside
    /// `data` into a typed receiver.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        path: &[&str],
    ) -> Result<T> {
        let data = self.execute(query, variables).await?;
        let node = at_path(&data, path)?;
        Ok(serde_json::from_value(node.clone())?)
    }

    /// Requests one more page of the described connection on top of the
    /// caller's variables (parent id plus any nested page variables). A
    /// `None` cursor requests the first page.
    pub async fn connection_page<T: DeserializeOwned + Default>(
        &self,
        desc: &ConnectionDesc,
        vars: &Value,
        per_page: i64,
        cursor: Option<&str>,
    ) -> Result<Connection<T>> {
        let mut variables = vars.as_object().cloned().unwrap_or_default();
        variables.insert(desc.page_var.to_string(), json!(per_page));
        variables.insert(desc.cursor_var.to_string(), json!(cursor));
        self.query(desc.query.as_str(), Value::Object(variables), desc.path)
            .await
    }

    /// Remaining rate limit for the v4 API.
    pub async fn rate_remaining(&self) -> Result<i64> {
        let data = self.execute(queries::RATE_LIMIT, json!({})).await?;
        data.pointer("/rateLimit/remaining")
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow!("missing rateLimit in GraphQL response"))
    }
}

fn at_path<'a>(data: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut node = data;
    for key in path {
        node = node
            .get(key)
            .ok_or_else(|| anyhow!("missing {} field in GraphQL response", key))?;
        if node.is_null() {
            return Err(NotFoundError {
                message: format!("{key} not found"),
            }
            .into());
        }
    }
    Ok(node)
}

fn map_graphql_errors(errors: &[Value]) -> anyhow::Error {
    if let Some(first) = errors.first() {
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown GraphQL error");
        let error_type = first
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if error_type == "NOT_FOUND" {
            return NotFoundError {
                message: message.to_string(),
            }
            .into();
        }
        if error_type.is_empty() {
            return anyhow!("GraphQL error: {}", message);
        }
        return anyhow!("GraphQL error ({}): {}", error_type, message);
    }
    anyhow!("unknown GraphQL error")
}
