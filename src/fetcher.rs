use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{Config, HTTP_TIMEOUT_SECS};
use crate::error::{AppError, Result};

/// Client for the homework review-status endpoint.
pub struct StatusClient {
    client: reqwest::Client,
    endpoint: String,
    auth_header: String,
}

impl StatusClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: cfg.api_endpoint.clone(),
            auth_header: format!("OAuth {}", cfg.api_token),
        })
    }

    /// GET `<endpoint>?from_date=<ts>` and return the decoded body unchanged.
    /// A missing or zero cursor falls back to the current time.
    pub async fn fetch_status(&self, from_date: Option<i64>) -> Result<Value> {
        let from_date = from_date.filter(|ts| *ts > 0).unwrap_or_else(now_secs);
        info!(from_date, "Requesting homework statuses");

        let resp = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(AppError::HttpStatus(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        debug!(bytes = body.len(), "Homework statuses received");
        Ok(value)
    }
}

/// Validate the response shape and pick the most recent homework.
///
/// The API lists homeworks newest first, so the first element is the one to
/// report. An empty list means there is nothing new and yields `Ok(None)`.
pub fn check_response(response: &Value) -> Result<Option<&Value>> {
    let obj = response.as_object().ok_or_else(|| {
        AppError::Shape(format!("response is not an object, got {}", json_type(response)))
    })?;
    let homeworks = match obj.get("homeworks") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(AppError::Shape(format!(
                "\"homeworks\" is not a list, got {}",
                json_type(other)
            )))
        }
        None => return Err(AppError::Shape("\"homeworks\" key is missing".to_string())),
    };
    Ok(homeworks.first())
}

/// Server-supplied cursor for the next request, if the response carries one.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(|d| d.as_i64())
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
