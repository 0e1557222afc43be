//! Readiness of the platform session.
//!
//! The phase only ever moves forward:
//! `Unauthenticated → Connecting → Ready`. Once ready, it stays ready for the
//! lifetime of the process, so readers never observe a regression.

use {serde::Serialize, tokio::sync::watch};

/// Lifecycle phase of a platform session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No credential configured, or login never attempted.
    #[default]
    Unauthenticated,
    /// Login started; waiting for the platform handshake.
    Connecting,
    /// Handshake complete; the session can serve reads.
    Ready,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Connecting => write!(f, "connecting"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Shared session state, cloned into request handlers via `Arc`.
#[derive(Debug)]
pub struct SessionState {
    phase: watch::Sender<SessionPhase>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        let (phase, _) = watch::channel(SessionPhase::Unauthenticated);
        Self { phase }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase() == SessionPhase::Ready
    }

    /// Record that login has started. Returns `false` if the session already
    /// left the `Unauthenticated` phase.
    pub fn begin_connecting(&self) -> bool {
        self.advance(SessionPhase::Unauthenticated, SessionPhase::Connecting)
    }

    /// Record the handshake-complete signal. Only the first signal counts;
    /// repeats (e.g. after a platform reconnect) return `false` and change
    /// nothing.
    pub fn mark_ready(&self) -> bool {
        self.advance(SessionPhase::Connecting, SessionPhase::Ready)
    }

    /// Wait until the session is ready. Resolves immediately if it already is.
    pub async fn wait_ready(&self) {
        let mut rx = self.phase.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|phase| *phase == SessionPhase::Ready).await;
    }

    fn advance(&self, from: SessionPhase, to: SessionPhase) -> bool {
        self.phase.send_if_modified(|phase| {
            if *phase == from {
                *phase = to;
                true
            } else {
                false
            }
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::sync::Arc, std::time::Duration};

    #[test]
    fn starts_unauthenticated() {
        let state = SessionState::new();
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
        assert!(!state.is_ready());
    }

    #[test]
    fn ready_requires_connecting_first() {
        let state = SessionState::new();
        assert!(!state.mark_ready());
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);

        assert!(state.begin_connecting());
        assert_eq!(state.phase(), SessionPhase::Connecting);
        assert!(!state.is_ready());

        assert!(state.mark_ready());
        assert!(state.is_ready());
    }

    #[test]
    fn repeated_signals_are_noops() {
        let state = SessionState::new();
        assert!(state.begin_connecting());
        assert!(!state.begin_connecting());
        assert!(state.mark_ready());
        assert!(!state.mark_ready());
        assert!(!state.begin_connecting());
        assert_eq!(state.phase(), SessionPhase::Ready);
    }

    #[test]
    fn phase_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(SessionPhase::Unauthenticated).unwrap(),
            "unauthenticated"
        );
        assert_eq!(SessionPhase::Connecting.to_string(), "connecting");
    }

    #[tokio::test]
    async fn wait_ready_resolves_after_signal() {
        let state = Arc::new(SessionState::new());
        state.begin_connecting();

        let waiter = tokio::spawn({
            let state = Arc::clone(&state);
            async move { state.wait_ready().await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        state.mark_ready();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn wait_ready_returns_immediately_when_ready() {
        let state = SessionState::new();
        state.begin_connecting();
        state.mark_ready();
        tokio::time::timeout(Duration::from_millis(100), state.wait_ready())
            .await
            .unwrap();
    }
}
