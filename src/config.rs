//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::conversation::ConversationStore;

/// Environment variable for the backend base URL.
pub const BASE_URL_ENV: &str = "CSVCHAT_BASE_URL";
/// Environment variable for the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "CSVCHAT_TIMEOUT_SECS";
/// Environment variable for the number of retained conversations.
pub const HISTORY_LIMIT_ENV: &str = "CSVCHAT_HISTORY_LIMIT";

/// Default backend location (the Flask development server).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Configuration for the chat client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL the `/chat` and `/upload_csv` paths are resolved against.
    pub base_url: String,
    /// Whole-request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// Maximum number of conversations kept in the history list.
    pub history_limit: usize,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            // LLM replies on the backend routinely take tens of seconds.
            request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            history_limit: ConversationStore::DEFAULT_CAPACITY,
            user_agent: format!("csvchat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CSVCHAT_*` environment variables.
    ///
    /// Unparseable numeric values are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.base_url = url;
        }
        if let Some(secs) = parse_env::<u64>(TIMEOUT_ENV) {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_env::<usize>(HISTORY_LIMIT_ENV) {
            config.history_limit = limit;
        }

        config
    }

    /// Set the backend base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the number of retained conversations.
    #[must_use]
    pub const fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring invalid environment value");
            None
        }
    }
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
