//! JSON-over-HTTP communication with the server.
//!
//! [`Comm`] is the seam the admin dispatcher talks to. [`HttpComm`] is the
//! reqwest implementation: it posts the payload, decodes the reply and
//! calls the success callback only when the server answers `rc: "ok"`.
//! Failures are logged and counted here and never reach the caller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::admin::AdminCommand;

/// Result code the server uses for success.
pub const RC_OK: &str = "ok";

/// Callback invoked with the server reply after a successful request.
pub type SuccessFn = Arc<dyn Fn(&AdminResponse) + Send + Sync>;

/// Decoded server reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminResponse {
    pub rc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AdminResponse {
    #[cfg(test)]
    pub fn ok() -> Self {
        Self {
            rc: RC_OK.to_string(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.rc == RC_OK
    }
}

#[derive(Debug, Error)]
pub enum CommError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("server rejected request (rc={rc}){}", message_suffix(.message))]
    Rejected { rc: String, message: Option<String> },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Sends a JSON payload to a server path.
#[async_trait]
pub trait Comm: Send + Sync {
    /// Post `payload` to `path`. `on_success` runs with the reply when the
    /// request succeeds. `description` names the request in log output.
    async fn json(
        &self,
        path: &str,
        payload: &AdminCommand,
        on_success: SuccessFn,
        description: &str,
    );
}

/// HTTP implementation of [`Comm`].
pub struct HttpComm {
    client: Client,
    base_url: String,
    failures: AtomicUsize,
}

impl HttpComm {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CommError> {
        let client = Client::builder()
            .user_agent(concat!("roberta-admin/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            failures: AtomicUsize::new(0),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests that did not succeed.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Post `payload` and decode the reply.
    pub async fn post_json(
        &self,
        path: &str,
        payload: &AdminCommand,
    ) -> Result<AdminResponse, CommError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(payload).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CommError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: AdminResponse = serde_json::from_str(&body)?;
        if !reply.is_ok() {
            return Err(CommError::Rejected {
                rc: reply.rc,
                message: reply.message,
            });
        }

        Ok(reply)
    }
}

#[async_trait]
impl Comm for HttpComm {
    async fn json(
        &self,
        path: &str,
        payload: &AdminCommand,
        on_success: SuccessFn,
        description: &str,
    ) {
        tracing::debug!("{description}: POST {}{path}", self.base_url);

        match self.post_json(path, payload).await {
            Ok(reply) => {
                tracing::debug!("{description}: {:?}", reply);
                on_success(&reply);
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                tracing::error!("{description} failed: {e}");
            }
        }
    }
}
