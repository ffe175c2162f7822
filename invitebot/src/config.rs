//! Configuration module for environment variable parsing.
//!
//! All settings come from the environment; the two Slack credentials are
//! required, everything else has a default.

use std::env;

use anyhow::{Context, Result};

/// Application URL included in the denial DM when none is configured.
pub const DEFAULT_APPLICATION_URL: &str = "https://devrelcollective.fun";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Slack signing secret for inbound request verification
    pub signing_secret: String,

    /// Slack bot token for outbound Web API calls
    pub bot_token: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Maximum age in seconds for inbound request timestamps
    pub signature_max_age: u64,

    /// HTTP request timeout in milliseconds for outbound calls
    pub request_timeout_ms: u64,

    /// Optional override for the trigger phrase set
    pub trigger_phrases: Option<Vec<String>>,

    /// Optional fixed channel for confirmation posts.
    /// When unset, confirmations go to the channel the event arrived on.
    pub confirm_channel: Option<String>,

    /// Membership application URL included in the denial DM
    pub application_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails only when one of the required Slack credentials is absent.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            signing_secret: env::var("SLACK_SIGNING_SECRET")
                .context("SLACK_SIGNING_SECRET must be set")?,

            bot_token: env::var("SLACK_BOT_TOKEN").context("SLACK_BOT_TOKEN must be set")?,

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            signature_max_age: env::var("SLACK_SIGNATURE_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300), // 5 minutes default

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            trigger_phrases: parse_csv("TRIGGER_PHRASES"),

            confirm_channel: env::var("CONFIRM_CHANNEL")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            application_url: env::var("APPLICATION_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_APPLICATION_URL.to_string()),
        })
    }
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
