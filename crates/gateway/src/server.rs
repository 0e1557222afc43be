use std::sync::Arc;

use {
    anyhow::Context,
    axum::{Router, http::HeaderValue, routing::get},
    tower_http::{
        cors::{AllowOrigin, Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::{info, warn},
};

use {
    klintar_channels::{ChannelHistory, ChannelWhitelist, SessionState},
    klintar_config::KlintarConfig,
};

use crate::{
    routes::{channel_messages_handler, health_handler, root_handler},
    state::GatewayState,
};

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the CORS layer for a single configured origin, or any origin for `*`.
pub fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = allowed_origin.trim();
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(origin)
            .with_context(|| format!("invalid allowed origin {origin:?}"))?;
        AllowOrigin::exact(value)
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(
    state: Arc<GatewayState>,
    cors: CorsLayer,
    http_request_logs: bool,
) -> Router {
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/channel/{id}/messages", get(channel_messages_handler))
        .layer(cors)
        .with_state(state);

    if http_request_logs {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Start the Discord session (if a token is configured) and serve HTTP until
/// Ctrl-C.
pub async fn start_gateway(config: KlintarConfig) -> anyhow::Result<()> {
    let session = Arc::new(SessionState::new());

    let discord = match config.discord.token() {
        Some(token) => Some(klintar_discord::start_session(token, Arc::clone(&session))),
        None => {
            warn!(
                "DISCORD_BOT_TOKEN is not set; the bot will not connect until a token is configured"
            );
            None
        },
    };

    let history = discord
        .as_ref()
        .map(|d| Arc::new(d.history()) as Arc<dyn ChannelHistory>);
    let whitelist = ChannelWhitelist::from_entries(&config.discord.channels_whitelist);
    if whitelist.is_empty() {
        info!("channel whitelist empty, all channels readable");
    } else {
        info!(channels = whitelist.len(), "channel whitelist loaded");
    }

    let state = GatewayState::with_limit(
        session,
        history,
        whitelist,
        config.discord.effective_history_limit(),
    );
    let cors = cors_layer(&config.server.allowed_origin)?;
    let app = build_gateway_app(state, cors, config.server.http_request_logs);

    let listener = tokio::net::TcpListener::bind((config.server.bind.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.server.bind, config.server.port
            )
        })?;
    info!(
        addr = %listener.local_addr()?,
        origin = %config.server.allowed_origin,
        "klintar gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some(discord) = discord {
        discord.abort();
    }
    info!("klintar gateway stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_wildcard_and_origins() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer(" * ").is_ok());
        assert!(cors_layer("https://klintar.example").is_ok());
    }

    #[test]
    fn cors_rejects_invalid_header_value() {
        assert!(cors_layer("https://bad\norigin").is_err());
    }
}
