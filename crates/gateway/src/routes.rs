//! Request handlers.

use std::sync::Arc;

use {
    axum::{
        extract::{Path, State},
        response::{IntoResponse, Json},
    },
    serde::Serialize,
    tracing::{debug, error},
};

use klintar_channels::{ChannelMessage, sort_chronologically};

use crate::{error::ApiError, state::GatewayState};

/// Body served by `GET /`.
pub const ROOT_BODY: &str = "Reino de Klintar backend active";

/// Successful response of `GET /api/channel/{id}/messages`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessagesResponse {
    pub channel_id: String,
    pub messages: Vec<ChannelMessage>,
}

pub async fn root_handler() -> &'static str {
    ROOT_BODY
}

pub async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    let phase = state.session.phase();
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "session": phase,
        "ready": state.session.is_ready(),
    }))
}

/// Whitelist first (even before readiness), then readiness, then the
/// upstream fetch. Messages are returned oldest first.
pub async fn channel_messages_handler(
    State(state): State<Arc<GatewayState>>,
    Path(channel_id): Path<String>,
) -> Result<Json<ChannelMessagesResponse>, ApiError> {
    if !state.whitelist.permits(&channel_id) {
        debug!(channel_id = %channel_id, "channel rejected by whitelist");
        return Err(ApiError::WhitelistRejected);
    }

    let history = match &state.history {
        Some(history) if state.session.is_ready() => history,
        _ => return Err(ApiError::NotReady),
    };

    let mut messages = history
        .fetch_recent_messages(&channel_id, state.history_limit)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                debug!(channel_id = %channel_id, error = %e, "channel not found or not textual");
            } else {
                error!(channel_id = %channel_id, error = %e, "failed to fetch channel messages");
            }
            ApiError::from(e)
        })?;

    sort_chronologically(&mut messages);

    Ok(Json(ChannelMessagesResponse {
        channel_id,
        messages,
    }))
}
