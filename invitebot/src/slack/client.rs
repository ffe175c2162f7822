//! Slack Web API client for outbound `chat.postMessage` calls.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Default base URL for the Slack Web API.
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Failure posting a message to the Slack Web API.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("slack api request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("slack api returned HTTP {0}")]
    Status(u16),
    #[error("slack api rejected message: {0}")]
    Api(String),
}

/// Request body for `chat.postMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessage {
    pub channel: String,
    pub text: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_user: Option<bool>,
    pub replace_original: bool,
}

/// Envelope every Web API method replies with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Thin client over the Slack Web API.
///
/// Holds the bot token and a pooled `reqwest` client; cheap to clone.
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    /// Build a client with the given bot token and outbound request timeout.
    pub fn new(token: String, timeout: Duration) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            token,
            base_url: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Post one message, failing on transport errors, non-2xx statuses,
    /// and `ok: false` API replies alike.
    pub async fn post_message(&self, msg: &PostMessage) -> Result<(), NotifyError> {
        let url = format!("{}/chat.postMessage", self.base_url);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(msg)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        let body: ApiResponse = resp.json().await?;
        if !body.ok {
            return Err(NotifyError::Api(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        info!(
            channel = %msg.channel,
            threaded = msg.thread_ts.is_some(),
            "slack_message_posted"
        );

        Ok(())
    }
}
