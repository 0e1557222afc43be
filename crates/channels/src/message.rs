use serde::{Deserialize, Serialize};

/// Author label used when the platform reports no username.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A channel message as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub id: String,
    pub author: String,
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChannelMessage {
    pub fn new(
        id: impl Into<String>,
        author: Option<&str>,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        let author = author
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR);
        Self {
            id: id.into(),
            author: author.to_string(),
            content: content.into(),
            timestamp,
        }
    }
}

/// Order messages oldest first. The sort is stable, so messages sharing a
/// timestamp keep the order the platform returned them in.
pub fn sort_chronologically(messages: &mut [ChannelMessage]) {
    messages.sort_by_key(|m| m.timestamp);
}
