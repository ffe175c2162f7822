//! Web server module for handling inbound webhooks.
//!
//! A thin server that:
//! - Receives Slack Events API callbacks
//! - Verifies the request signature over the raw body
//! - Classifies the event and runs the denial workflow inline

pub mod handlers;
pub mod signature;

pub use handlers::{
    health, slack_events, slack_events_get, AppState, HealthResponse, WebhookResponse,
    SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
pub use signature::{sign_request, verify_slack_signature};
