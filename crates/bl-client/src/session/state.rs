//! Session lifecycle state

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a relay session
///
/// `Idle → Dialing → Authenticating → Active → Closed`; any state may move
/// straight to `Closed` on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// Nothing attempted yet
    Idle = 0,
    /// Trying candidate relays in order
    Dialing = 1,
    /// Handshake sent, waiting for the reply
    Authenticating = 2,
    /// Heartbeat and receiver tasks are running
    Active = 3,
    /// Terminal; the connection has been released
    Closed = 4,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Dialing,
            2 => Self::Authenticating,
            3 => Self::Active,
            _ => Self::Closed,
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Dialing => "dialing",
            Self::Authenticating => "authenticating",
            Self::Active => "active",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// State field shared between the session handle and its tasks
#[derive(Debug)]
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub(crate) fn new(state: SessionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn get(&self) -> SessionState {
        SessionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move to `next` unless the session is already closed
    ///
    /// Returns the previous state.
    pub(crate) fn transition(&self, next: SessionState) -> SessionState {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if SessionState::from_u8(current).is_terminal() {
                return SessionState::Closed;
            }
            match self.0.compare_exchange_weak(
                current,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(prev) => {
                    let prev = SessionState::from_u8(prev);
                    tracing::debug!(from = %prev, to = %next, "session state changed");
                    return prev;
                }
                Err(actual) => current = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_follow_lifecycle() {
        let state = AtomicState::new(SessionState::Idle);
        assert_eq!(state.transition(SessionState::Dialing), SessionState::Idle);
        assert_eq!(
            state.transition(SessionState::Authenticating),
            SessionState::Dialing
        );
        assert_eq!(
            state.transition(SessionState::Active),
            SessionState::Authenticating
        );
        assert_eq!(state.get(), SessionState::Active);
    }

    #[test]
    fn test_closed_is_terminal() {
        let state = AtomicState::new(SessionState::Active);
        state.transition(SessionState::Closed);
        assert_eq!(state.transition(SessionState::Active), SessionState::Closed);
        assert_eq!(state.get(), SessionState::Closed);
    }
}
