use std::sync::Arc;

use {
    secrecy::{ExposeSecret, Secret},
    serenity::{Client, http::Http},
    tokio::task::JoinHandle,
    tracing::{error, info, warn},
};

use klintar_channels::SessionState;

use crate::{handler::DiscordHandler, history::DiscordHistory};

/// A running Discord login plus the REST reader bound to the same token.
pub struct DiscordSession {
    history: DiscordHistory,
    task: JoinHandle<()>,
}

impl DiscordSession {
    /// REST reader for channel history.
    pub fn history(&self) -> DiscordHistory {
        self.history.clone()
    }

    /// Stop the gateway connection.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Start logging the bot in.
///
/// Moves `session` to `Connecting` and spawns a background task that runs
/// serenity's gateway client; the `READY` event moves it to `Ready`. A login
/// failure is logged and never retried, leaving the session in `Connecting`.
pub fn start_session(token: &Secret<String>, session: Arc<SessionState>) -> DiscordSession {
    let token = token.expose_secret().trim().to_string();
    let http = Arc::new(Http::new(&token));

    session.begin_connecting();
    info!("connecting discord bot");

    let task = tokio::spawn(run_gateway(token, session));

    DiscordSession {
        history: DiscordHistory::new(http),
        task,
    }
}

async fn run_gateway(token: String, session: Arc<SessionState>) {
    let client = Client::builder(&token, DiscordHandler::intents())
        .event_handler(DiscordHandler::new(session))
        .await;

    let mut client = match client {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to log in discord bot");
            return;
        },
    };

    match client.start().await {
        Ok(()) => warn!("discord gateway connection closed"),
        Err(e) => error!(error = %e, "failed to log in discord bot"),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, klintar_channels::SessionPhase};

    #[tokio::test]
    async fn start_moves_session_to_connecting() {
        let state = Arc::new(SessionState::new());
        let session = start_session(&Secret::new("not-a-real-token".into()), Arc::clone(&state));
        assert_eq!(state.phase(), SessionPhase::Connecting);
        assert!(!state.is_ready());
        session.abort();
    }
}
