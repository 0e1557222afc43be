//! Channel abstractions shared by the gateway and the Discord session.
//!
//! The gateway only ever talks to a [`ChannelHistory`] implementation and a
//! [`SessionState`]; the platform-specific crates provide the concrete types.

pub mod error;
pub mod gating;
pub mod history;
pub mod message;
pub mod session;

pub use {
    error::{Error, Result},
    gating::ChannelWhitelist,
    history::{ChannelHistory, DEFAULT_HISTORY_LIMIT},
    message::{ChannelMessage, UNKNOWN_AUTHOR, sort_chronologically},
    session::{SessionPhase, SessionState},
};
