//! InviteBot - Slack invite-gate webhook service.
//!
//! Listens for Slack Events API callbacks, verifies each request's HMAC
//! signature, and answers direct invite attempts with a DM pointing at the
//! membership application process plus a threaded confirmation post.
//!
//! ## Architecture
//!
//! ```text
//! Slack Events API → Signature Verifier → Classifier → Notifier → Slack Web API
//! ```

pub mod classify;
pub mod config;
pub mod event;
pub mod slack;
pub mod web;

// Re-export commonly used types
pub use classify::{first_user_mention, is_help_request, TriggerSet};
pub use config::Config;
pub use event::{EventEnvelope, InboundEvent, MessageEvent};
pub use slack::{Notifier, NotifyError, PostMessage, SlackClient};
pub use web::AppState;
