//! Gateway: HTTP surface of klintar.
//!
//! Lifecycle:
//! 1. Load config (done by the CLI)
//! 2. Start the Discord session in the background if a token is configured
//! 3. Serve `/`, `/health` and `/api/channel/{id}/messages`
//!
//! Handlers only read shared state; the session flips readiness on its own.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;
