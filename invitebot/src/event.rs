//! Slack Events API payload types.
//!
//! These model the subset of the `event_callback` envelope the bot acts on.
//! Slack omits fields freely depending on event subtype, so everything beyond
//! the envelope `type` is defaulted; absence never fails deserialization.

use serde::Deserialize;

/// Outer Slack Events API envelope.
///
/// `kind` is `"url_verification"` for the one-time endpoint handshake,
/// `"event_callback"` for ordinary event deliveries.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub api_app_id: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub event_time: i64,
    /// Present only on `url_verification` handshakes.
    #[serde(default)]
    pub challenge: Option<String>,
    /// Present only on `event_callback` deliveries.
    #[serde(default)]
    pub event: Option<MessageEvent>,
}

/// Inner message event.
///
/// Invite notices arrive as `message` events with subtype `message_changed`,
/// where the interesting text lives on the nested `message` object. Plain
/// messages carry `text`/`user`/`ts` at this level instead.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub event_ts: String,
    #[serde(default)]
    pub message: Option<NestedMessage>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Nested message carried by `message_changed` events.
#[derive(Debug, Clone, Deserialize)]
pub struct NestedMessage {
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Message attachment; only the text is inspected.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub fallback: Option<String>,
    #[serde(default)]
    pub callback_id: Option<String>,
}

/// Transient per-request view of one inbound event.
///
/// Flattens the nested/top-level split of [`MessageEvent`] into the handful
/// of fields the classifier and notifier need. Lives only for the duration
/// of one request.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Message body, preferring the nested message's text
    pub text: String,
    /// Timestamp of the message, used for threading the confirmation
    pub ts: String,
    /// Sender identifier, when Slack supplied one
    pub sender: Option<String>,
    /// Channel the event arrived on
    pub channel: String,
    /// Text of any attachments on the message
    pub attachment_text: Vec<String>,
}

impl InboundEvent {
    /// Flatten a [`MessageEvent`] into the per-request view.
    pub fn from_event(event: &MessageEvent) -> Self {
        match &event.message {
            Some(msg) => InboundEvent {
                text: msg.text.clone(),
                ts: if msg.ts.is_empty() {
                    event.ts.clone()
                } else {
                    msg.ts.clone()
                },
                sender: msg.user.clone(),
                channel: event.channel.clone(),
                attachment_text: collect_attachment_text(&msg.attachments),
            },
            None => InboundEvent {
                text: event.text.clone().unwrap_or_default(),
                ts: event.ts.clone(),
                sender: event.user.clone(),
                channel: event.channel.clone(),
                attachment_text: collect_attachment_text(&event.attachments),
            },
        }
    }

    /// All inspectable text on the event: the body followed by attachments.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.text.as_str())
            .chain(self.attachment_text.iter().map(String::as_str))
    }
}

fn collect_attachment_text(attachments: &[Attachment]) -> Vec<String> {
    attachments
        .iter()
        .filter_map(|a| a.text.clone())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE_CHANGED: &str = r#"{
        "token": "tok",
        "team_id": "T123",
        "api_app_id": "A123",
        "type": "event_callback",
        "event_id": "Ev123",
        "event_time": 1700000000,
        "event": {
            "type": "message",
            "subtype": "message_changed",
            "hidden": true,
            "channel": "C456",
            "channel_type": "channel",
            "ts": "1700000001.000100",
            "event_ts": "1700000001.000100",
            "message": {
                "bot_id": "B789",
                "type": "message",
                "text": "<@U0AAA111> requested to invite one person to this workspace.",
                "user": "USLACKBOT",
                "ts": "1700000000.000200",
                "attachments": [
                    {"id": 1, "text": "Reason: they work with us"}
                ]
            }
        }
    }"#;

    #[test]
    fn test_envelope_message_changed() {
        let envelope: EventEnvelope = serde_json::from_str(MESSAGE_CHANGED).unwrap();
        assert_eq!(envelope.kind, "event_callback");
        assert_eq!(envelope.event_id, "Ev123");
        assert!(envelope.challenge.is_none());

        let event = envelope.event.unwrap();
        assert_eq!(event.subtype.as_deref(), Some("message_changed"));

        let inbound = InboundEvent::from_event(&event);
        assert!(inbound.text.contains("requested to invite"));
        assert_eq!(inbound.ts, "1700000000.000200");
        assert_eq!(inbound.sender.as_deref(), Some("USLACKBOT"));
        assert_eq!(inbound.channel, "C456");
        assert_eq!(
            inbound.attachment_text,
            vec!["Reason: they work with us".to_string()]
        );
    }

    #[test]
    fn test_envelope_plain_message() {
        let json = r#"{
            "type": "event_callback",
            "event": {
                "type": "message",
                "channel": "C456",
                "user": "U0BBB222",
                "text": "hello there",
                "ts": "1700000002.000300"
            }
        }"#;

        let envelope: EventEnvelope = serde_json::from_str(json).unwrap();
        let inbound = InboundEvent::from_event(&envelope.event.unwrap());

        assert_eq!(inbound.text, "hello there");
        assert_eq!(inbound.ts, "1700000002.000300");
        assert_eq!(inbound.sender.as_deref(), Some("U0BBB222"));
        assert!(inbound.attachment_text.is_empty());
    }

    #[test]
    fn test_envelope_url_verification() {
        let json = r#"{"type": "url_verification", "challenge": "abc123xyz"}"#;
        let envelope: EventEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.kind, "url_verification");
        assert_eq!(envelope.challenge.as_deref(), Some("abc123xyz"));
        assert!(envelope.event.is_none());
    }

    #[test]
    fn test_nested_ts_falls_back_to_event_ts() {
        let json = r#"{
            "type": "event_callback",
            "event": {
                "type": "message",
                "subtype": "message_changed",
                "channel": "C456",
                "ts": "1700000003.000400",
                "message": {"text": "edited"}
            }
        }"#;

        let envelope: EventEnvelope = serde_json::from_str(json).unwrap();
        let inbound = InboundEvent::from_event(&envelope.event.unwrap());

        assert_eq!(inbound.ts, "1700000003.000400");
    }

    #[test]
    fn test_texts_covers_body_and_attachments() {
        let inbound = InboundEvent {
            text: "body".to_string(),
            ts: "1.2".to_string(),
            sender: None,
            channel: "C1".to_string(),
            attachment_text: vec!["first".to_string(), "second".to_string()],
        };

        let all: Vec<&str> = inbound.texts().collect();
        assert_eq!(all, vec!["body", "first", "second"]);
    }
}
