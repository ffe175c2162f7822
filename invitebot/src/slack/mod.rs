//! Outbound Slack Web API integration.
//!
//! `client` is the transport (one authenticated `chat.postMessage` call);
//! `notify` is the two-step denial workflow built on top of it.

pub mod client;
pub mod notify;

pub use client::{NotifyError, PostMessage, SlackClient, DEFAULT_API_BASE};
pub use notify::{Notifier, BOT_USERNAME};
