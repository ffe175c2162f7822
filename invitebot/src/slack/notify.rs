//! Two-step denial notification workflow.
//!
//! On a triggered event the bot sends, in order:
//! 1. a DM to the requesting member pointing at the application process
//! 2. a confirmation post threaded on the original message
//!
//! A failure of the first call aborts the workflow; the second call is not
//! attempted. There is no retry.

use tracing::info;

use super::client::{NotifyError, PostMessage, SlackClient};
use crate::event::InboundEvent;

/// Display name the bot posts under.
pub const BOT_USERNAME: &str = "InviteBot";

const CONFIRMATION_TEXT: &str = ":avocado-heart: InviteBot Handled this via DM";

fn denial_text(application_url: &str) -> String {
    format!(
        ":avocado-heart: Sorry, direct invites are not allowed in this Slack. \
         All members must go through the application process at: {application_url}"
    )
}

/// Sends the denial DM and confirmation post for triggered events.
#[derive(Clone)]
pub struct Notifier {
    client: SlackClient,
    application_url: String,
    confirm_channel: Option<String>,
}

impl Notifier {
    pub fn new(
        client: SlackClient,
        application_url: String,
        confirm_channel: Option<String>,
    ) -> Self {
        Self {
            client,
            application_url,
            confirm_channel,
        }
    }

    /// The DM sent to the member who attempted the invite.
    pub fn denial_dm(&self, requester: &str, ts: &str) -> PostMessage {
        PostMessage {
            channel: requester.to_string(),
            text: denial_text(&self.application_url),
            username: BOT_USERNAME.to_string(),
            thread_ts: None,
            message_ts: Some(ts.to_string()),
            as_user: Some(true),
            replace_original: false,
        }
    }

    /// The confirmation post, threaded on the original message.
    ///
    /// Goes to the configured confirmation channel when set, otherwise to
    /// the channel the event arrived on.
    pub fn confirmation(&self, event_channel: &str, ts: &str) -> PostMessage {
        let channel = self
            .confirm_channel
            .as_deref()
            .unwrap_or(event_channel)
            .to_string();
        PostMessage {
            channel,
            text: CONFIRMATION_TEXT.to_string(),
            username: BOT_USERNAME.to_string(),
            thread_ts: Some(ts.to_string()),
            message_ts: None,
            as_user: None,
            replace_original: true,
        }
    }

    /// Run the two-step workflow for one triggered event.
    pub async fn notify_denied(
        &self,
        requester: &str,
        event: &InboundEvent,
    ) -> Result<(), NotifyError> {
        self.client
            .post_message(&self.denial_dm(requester, &event.ts))
            .await?;

        self.client
            .post_message(&self.confirmation(&event.channel, &event.ts))
            .await?;

        info!(
            requester = %requester,
            channel = %event.channel,
            ts = %event.ts,
            "invite_denial_notified"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn notifier(confirm_channel: Option<String>) -> Notifier {
        let client = SlackClient::new("xoxb-test".to_string(), Duration::from_millis(100))
            .unwrap();
        Notifier::new(
            client,
            "https://devrelcollective.fun".to_string(),
            confirm_channel,
        )
    }

    #[test]
    fn test_denial_dm_targets_requester() {
        let msg = notifier(None).denial_dm("U0AAA111", "1700000000.000200");

        assert_eq!(msg.channel, "U0AAA111");
        assert_eq!(msg.username, BOT_USERNAME);
        assert_eq!(msg.message_ts.as_deref(), Some("1700000000.000200"));
        assert_eq!(msg.as_user, Some(true));
        assert!(!msg.replace_original);
        assert!(msg.text.contains("direct invites are not allowed"));
        assert!(msg.text.contains("https://devrelcollective.fun"));
    }

    #[test]
    fn test_confirmation_threads_on_original_ts() {
        let msg = notifier(None).confirmation("C456", "1700000000.000200");

        assert_eq!(msg.channel, "C456");
        assert_eq!(msg.thread_ts.as_deref(), Some("1700000000.000200"));
        assert!(msg.replace_original);
        assert_eq!(msg.text, CONFIRMATION_TEXT);
    }

    #[test]
    fn test_confirmation_honors_configured_channel() {
        let msg = notifier(Some("C999".to_string())).confirmation("C456", "1.2");
        assert_eq!(msg.channel, "C999");
    }

    #[test]
    fn test_denial_text_includes_application_url() {
        let text = denial_text("https://example.org/apply");
        assert!(text.ends_with("https://example.org/apply"));
    }
}
