//! Types for conversation management.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::ConversationId;

/// Who authored a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed by the person using the widget.
    User,
    /// Produced by the backend or by local fallbacks.
    Bot,
}

impl Sender {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "bot" => Ok(Self::Bot),
            _ => Err(value.to_string()),
        }
    }
}

/// A message in a conversation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub sender: Sender,
    /// Message content.
    pub text: String,
    /// Timestamp in milliseconds since Unix epoch.
    pub timestamp: i64,
}

impl ChatMessage {
    /// Build a message stamped with the current time.
    #[must_use]
    pub fn now(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Which rule produced the current title.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    /// Counter-based placeholder, still replaceable.
    #[default]
    Default,
    /// Derived from the first user message.
    FirstMessage,
    /// Derived from an uploaded CSV file name.
    Upload,
}

/// One chat thread with its own history and optional attached CSV.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier.
    pub id: ConversationId,
    /// Display title.
    pub title: String,
    /// Rule that produced `title`.
    pub title_source: TitleSource,
    /// Messages in arrival order.
    pub messages: Vec<ChatMessage>,
    /// Name of the CSV file attached by a successful upload.
    pub csv_file: Option<String>,
    /// Columns reported by the backend for the attached CSV.
    pub csv_columns: Option<Vec<String>>,
    /// Creation timestamp in milliseconds since Unix epoch.
    pub created_at: i64,
}

impl Conversation {
    /// Create an empty conversation with a placeholder title.
    #[must_use]
    pub fn new(id: ConversationId, title: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id,
            title: title.into(),
            title_source: TitleSource::Default,
            messages: Vec::new(),
            csv_file: None,
            csv_columns: None,
            created_at: now_ms,
        }
    }

    /// Whether a CSV file is attached.
    #[must_use]
    pub const fn has_csv(&self) -> bool {
        self.csv_file.is_some()
    }

    /// Whether the title can still be replaced by a derivation rule.
    #[must_use]
    pub fn title_is_default(&self) -> bool {
        self.title_source == TitleSource::Default
    }
}
