//! Discord event handler for serenity.
//!
//! Only lifecycle events matter here; message events are never requested.

use std::sync::Arc;

use {
    serenity::{
        all::{Context, EventHandler, GatewayIntents, GuildId, Ready, ResumedEvent},
        async_trait,
    },
    tracing::{debug, info},
};

use klintar_channels::SessionState;

/// Handler for Discord gateway events.
pub struct DiscordHandler {
    pub session: Arc<SessionState>,
}

impl DiscordHandler {
    pub fn new(session: Arc<SessionState>) -> Self {
        Self { session }
    }

    /// Gateway intents needed to read guild channel history.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    /// Apply a handshake-complete signal. Returns `true` on the first one.
    pub fn on_ready(&self, bot_name: &str, guilds: usize) -> bool {
        if self.session.mark_ready() {
            info!(bot_name, guilds, "discord bot connected");
            true
        } else {
            debug!(
                bot_name,
                phase = %self.session.phase(),
                "ignoring repeated discord ready event"
            );
            false
        }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.on_ready(&ready.user.tag(), ready.guilds.len());
    }

    async fn resume(&self, _ctx: Context, _event: ResumedEvent) {
        debug!("discord gateway session resumed");
    }

    async fn cache_ready(&self, _ctx: Context, guilds: Vec<GuildId>) {
        debug!(guild_count = guilds.len(), "discord cache ready");
    }
}
