//! Discord session for klintar.
//!
//! Logs the bot in through serenity's gateway client, flips the shared
//! [`klintar_channels::SessionState`] to ready on the `READY` event, and reads
//! channel history through Discord's REST API.

pub mod handler;
pub mod history;
pub mod session;

pub use {
    handler::DiscordHandler,
    history::DiscordHistory,
    session::{DiscordSession, start_session},
};
