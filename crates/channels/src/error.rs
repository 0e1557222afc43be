use std::error::Error as StdError;

/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed channel errors shared across channel traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The channel id does not resolve to a channel visible to the bot.
    #[error("channel not found: {channel_id}")]
    ChannelNotFound { channel_id: String },

    /// The channel exists but cannot hold message history.
    #[error("channel {channel_id} is not textual ({kind})")]
    NotTextual { channel_id: String, kind: String },

    /// Operation is currently unavailable (not configured/ready).
    #[error("channel operation unavailable: {message}")]
    Unavailable { message: String },

    /// Wrapped source error from an external dependency.
    #[error("channel operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn channel_not_found(channel_id: impl std::fmt::Display) -> Self {
        Self::ChannelNotFound {
            channel_id: channel_id.to_string(),
        }
    }

    #[must_use]
    pub fn not_textual(channel_id: impl std::fmt::Display, kind: impl std::fmt::Display) -> Self {
        Self::NotTextual {
            channel_id: channel_id.to_string(),
            kind: kind.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// `true` when the channel could not be resolved or is not message-bearing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound { .. } | Self::NotTextual { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(Error::channel_not_found("42").is_not_found());
        assert!(Error::not_textual("42", "category").is_not_found());
        assert!(!Error::unavailable("offline").is_not_found());

        let io = std::io::Error::other("connection reset");
        let err = Error::external("fetch messages", io);
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "channel operation failed: fetch messages: connection reset"
        );
    }
}
