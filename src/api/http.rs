//! reqwest-backed [`ApiTransport`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::{ApiTransport, RequestOpts};
use crate::credentials::CredentialStore;
use crate::error::ApiError;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        credentials: Arc<CredentialStore>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        opts: RequestOpts,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method.clone(), &url);

        if opts.requires_auth {
            let token = self
                .credentials
                .get()
                .await
                .ok_or(ApiError::MissingCredential)?;
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!(%method, %url, requires_auth = opts.requires_auth, "api call");

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status.is_success() {
            if text.is_empty() {
                // 204-style replies (delete, logout) have no body.
                return Ok(Value::Null);
            }
            serde_json::from_str(&text)
                .map_err(|e| ApiError::Transport(format!("invalid JSON body: {e}")))
        } else {
            Err(ApiError::Remote {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            })
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, path: &str, opts: RequestOpts) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None, opts).await
    }

    async fn post(&self, path: &str, body: Value, opts: RequestOpts) -> Result<Value, ApiError> {
        self.send(Method::POST, path, Some(&body), opts).await
    }

    async fn put(&self, path: &str, body: Value, opts: RequestOpts) -> Result<Value, ApiError> {
        self.send(Method::PUT, path, Some(&body), opts).await
    }

    async fn delete(&self, path: &str, opts: RequestOpts) -> Result<Value, ApiError> {
        self.send(Method::DELETE, path, None, opts).await
    }
}

/// Pull a human-readable message out of an error body.
///
/// The API answers errors as `{"message": "..."}` (some routes use
/// `{"error": "..."}`); anything else falls back to the status code.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = parsed.get(key).and_then(Value::as_str) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
    }
    format!("request failed with status {status}")
}
