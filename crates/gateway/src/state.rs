use std::sync::Arc;

use klintar_channels::{ChannelHistory, ChannelWhitelist, DEFAULT_HISTORY_LIMIT, SessionState};

/// Shared state injected into every request handler.
pub struct GatewayState {
    /// Server version reported by `/health`.
    pub version: String,
    /// Readiness of the platform session.
    pub session: Arc<SessionState>,
    /// History reader; `None` when no bot token is configured.
    pub history: Option<Arc<dyn ChannelHistory>>,
    /// Channels the API may read, parsed once at startup.
    pub whitelist: ChannelWhitelist,
    /// Messages fetched per request.
    pub history_limit: u8,
}

impl GatewayState {
    pub fn new(
        session: Arc<SessionState>,
        history: Option<Arc<dyn ChannelHistory>>,
        whitelist: ChannelWhitelist,
    ) -> Arc<Self> {
        Self::with_limit(session, history, whitelist, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(
        session: Arc<SessionState>,
        history: Option<Arc<dyn ChannelHistory>>,
        whitelist: ChannelWhitelist,
        history_limit: u8,
    ) -> Arc<Self> {
        Arc::new(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            session,
            history,
            whitelist,
            history_limit,
        })
    }
}
