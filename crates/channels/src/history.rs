use async_trait::async_trait;

use crate::{Result, message::ChannelMessage};

/// Number of messages fetched per request unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: u8 = 50;

/// Read access to a platform's channel history.
///
/// Callers must only invoke this once the owning session is ready; the
/// implementation does not re-check readiness.
#[async_trait]
pub trait ChannelHistory: Send + Sync {
    /// Fetch up to `limit` of the most recent messages in `channel_id`.
    ///
    /// The returned batch is unordered. Unresolvable and non-text channels
    /// are reported with errors for which [`crate::Error::is_not_found`]
    /// returns `true`; anything else is a generic upstream failure.
    async fn fetch_recent_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>>;
}
