//! Trigger phrase classification for inbound messages.
//!
//! Pure string matching: one case-normalization step, then substring
//! containment against an enumerated phrase set.

use tracing::debug;

/// Phrases whose presence marks a direct invite attempt.
///
/// Slack inserts "requested to invite" into the slackbot notice when a member
/// tries to invite someone directly.
pub const DEFAULT_TRIGGER_PHRASES: &[&str] = &["requested to invite"];

/// Phrases treated as a request for help with the bot.
pub const HELP_PHRASES: &[&str] = &["?", "help"];

/// An enumerated, case-normalized set of trigger phrases.
#[derive(Debug, Clone)]
pub struct TriggerSet {
    phrases: Vec<String>,
}

impl TriggerSet {
    /// Build a set from the given phrases, lowercasing and dropping blanks.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Build from an optional configured override, falling back to the
    /// default phrase set.
    pub fn from_config(overrides: Option<&[String]>) -> Self {
        match overrides {
            Some(list) if !list.is_empty() => Self::new(list.iter()),
            _ => Self::new(DEFAULT_TRIGGER_PHRASES.iter()),
        }
    }

    /// True iff the text contains any trigger phrase, case-insensitively.
    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let haystack = text.to_lowercase();
        let hit = self.phrases.iter().any(|p| haystack.contains(p.as_str()));
        if hit {
            debug!(text_length = text.len(), "trigger_phrase_matched");
        }
        hit
    }

    /// True iff any of the given texts contains a trigger phrase.
    pub fn matches_any<'a, I>(&self, texts: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().any(|t| self.matches(t))
    }
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_PHRASES.iter())
    }
}

/// True iff the text reads as a help request.
pub fn is_help_request(text: &str) -> bool {
    let normalized = text.to_lowercase();
    HELP_PHRASES.iter().any(|p| normalized.contains(p))
}

/// Extract the user ID from the first `<@U…>` mention in the text.
///
/// Handles the `<@U123|name>` form by dropping the display-name suffix.
/// Returns `None` when no well-formed mention exists.
pub fn first_user_mention(text: &str) -> Option<&str> {
    let start = text.find("<@")? + 2;
    let rest = &text[start..];
    let end = rest.find('>')?;
    let id = rest[..end].split('|').next()?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
