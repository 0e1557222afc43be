//! HTTP-facing errors for the channel API.

use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Serialize,
    thiserror::Error,
};

/// Failures of `GET /api/channel/{id}/messages`, each with a fixed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("channel not permitted (whitelist)")]
    WhitelistRejected,

    #[error("bot not ready")]
    NotReady,

    #[error("channel not found or not textual")]
    ChannelUnresolvedOrNonText,

    #[error("internal error fetching messages")]
    UpstreamFetchFailure,
}

impl ApiError {
    #[must_use]
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::WhitelistRejected => StatusCode::FORBIDDEN,
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::ChannelUnresolvedOrNonText => StatusCode::NOT_FOUND,
            Self::UpstreamFetchFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<klintar_channels::Error> for ApiError {
    fn from(err: klintar_channels::Error) -> Self {
        if err.is_not_found() {
            Self::ChannelUnresolvedOrNonText
        } else {
            Self::UpstreamFetchFailure
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
