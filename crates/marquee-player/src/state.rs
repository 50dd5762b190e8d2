//! Playback session state machine.
//!
//! A session moves through
//! `Idle -> Attaching -> Ready -> Playing <-> Buffering -> (Error | Ended)`
//! with `Recovering` covering transient network/media failures and
//! `Destroyed` as the terminal state after unmount. All changes go through
//! [`SessionState::transition`], so combinations such as "errored while
//! playing" cannot be represented.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which automatic recovery is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryKind {
    /// Segment or manifest fetch failed; loading is restarted.
    Network,
    /// Decoding failed; the decode pipeline is reinitialised.
    Media,
}

impl RecoveryKind {
    /// Transient message shown while recovering.
    pub fn message(self) -> &'static str {
        match self {
            Self::Network => "Network error, retrying...",
            Self::Media => "Media format error, recovering...",
        }
    }
}

/// State of a single playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "recovery", rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Attaching,
    Ready,
    Playing,
    Buffering,
    Recovering(RecoveryKind),
    Error,
    Ended,
    Destroyed,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// Start (or restart) attaching a stream.
    Attach,
    /// The episode list became empty; nothing is attached.
    Reset,
    /// Manifest parsed, or native metadata loaded.
    Loaded,
    /// Media is advancing.
    Playing,
    /// Media stalled waiting for data.
    Waiting,
    /// Browser refused to start playback without a gesture.
    AutoplayBlocked,
    /// Fatal, recoverable failure.
    Recover(RecoveryKind),
    /// Fatal, unrecoverable failure.
    Fatal,
    /// Reached the end of the media.
    Ended,
    /// Component unmounted.
    Teardown,
}

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid transition from {from} on {event:?}")]
pub struct InvalidTransition {
    pub from: SessionState,
    pub event: SessionEvent,
}

impl SessionState {
    /// Compute the next state for `event`.
    pub fn transition(&self, event: &SessionEvent) -> Result<SessionState, InvalidTransition> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (*self, *event) {
            (_, E::Teardown) => S::Destroyed,
            (S::Destroyed, _) => return Err(self.invalid(event)),

            (_, E::Attach) => S::Attaching,
            (_, E::Reset) => S::Idle,

            (S::Attaching, E::Loaded) => S::Ready,
            (S::Recovering(_), E::Loaded) => S::Ready,

            (S::Ready, E::AutoplayBlocked) => S::Ready,

            (S::Ready | S::Buffering | S::Recovering(_) | S::Ended | S::Playing, E::Playing) => {
                S::Playing
            }

            (S::Playing | S::Buffering, E::Waiting) => S::Buffering,
            (S::Recovering(kind), E::Waiting) => S::Recovering(kind),

            (
                S::Attaching | S::Ready | S::Playing | S::Buffering | S::Recovering(_),
                E::Recover(kind),
            ) => S::Recovering(kind),

            (S::Idle | S::Error, E::Fatal) => return Err(self.invalid(event)),
            (_, E::Fatal) => S::Error,

            (S::Ready | S::Playing | S::Buffering, E::Ended) => S::Ended,

            _ => return Err(self.invalid(event)),
        };
        Ok(next)
    }

    fn invalid(&self, event: &SessionEvent) -> InvalidTransition {
        InvalidTransition {
            from: *self,
            event: *event,
        }
    }

    /// Whether a loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Attaching | Self::Buffering)
    }

    /// Whether an adaptive-stream client may be alive in this state.
    pub fn has_live_session(&self) -> bool {
        !matches!(self, Self::Idle | Self::Error | Self::Destroyed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Attaching => write!(f, "attaching"),
            Self::Ready => write!(f, "ready"),
            Self::Playing => write!(f, "playing"),
            Self::Buffering => write!(f, "buffering"),
            Self::Recovering(RecoveryKind::Network) => write!(f, "recovering(network)"),
            Self::Recovering(RecoveryKind::Media) => write!(f, "recovering(media)"),
            Self::Error => write!(f, "error"),
            Self::Ended => write!(f, "ended"),
            Self::Destroyed => write!(f, "destroyed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn run(events: &[SessionEvent]) -> Result<SessionState, InvalidTransition> {
        events
            .iter()
            .try_fold(SessionState::Idle, |state, event| state.transition(event))
    }

    #[test]
    fn test_happy_path() {
        let state = run(&[
            SessionEvent::Attach,
            SessionEvent::Loaded,
            SessionEvent::Playing,
            SessionEvent::Waiting,
            SessionEvent::Playing,
            SessionEvent::Ended,
        ]);
        assert_eq!(state, Ok(SessionState::Ended));
    }

    #[test]
    fn test_autoplay_blocked_stays_ready() {
        let state = run(&[
            SessionEvent::Attach,
            SessionEvent::Loaded,
            SessionEvent::AutoplayBlocked,
        ]);
        assert_eq!(state, Ok(SessionState::Ready));
    }

    #[test]
    fn test_recovery_returns_to_playing() {
        let state = run(&[
            SessionEvent::Attach,
            SessionEvent::Loaded,
            SessionEvent::Playing,
            SessionEvent::Recover(RecoveryKind::Network),
        ]);
        assert_eq!(state, Ok(SessionState::Recovering(RecoveryKind::Network)));
        assert_eq!(
            state.unwrap().transition(&SessionEvent::Playing),
            Ok(SessionState::Playing)
        );
    }

    #[test]
    fn test_fatal_then_reattach() {
        let state = run(&[SessionEvent::Attach, SessionEvent::Fatal]).unwrap();
        assert_eq!(state, SessionState::Error);
        assert!(!state.has_live_session());
        assert_eq!(
            state.transition(&SessionEvent::Attach),
            Ok(SessionState::Attaching)
        );
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let state = run(&[SessionEvent::Attach, SessionEvent::Loaded, SessionEvent::Playing]).unwrap();
        assert_eq!(state.transition(&SessionEvent::Reset), Ok(SessionState::Idle));
        assert_eq!(
            SessionState::Error.transition(&SessionEvent::Reset),
            Ok(SessionState::Idle)
        );
        assert!(SessionState::Destroyed
            .transition(&SessionEvent::Reset)
            .is_err());
    }

    #[test]
    fn test_error_rejects_playing() {
        let err = SessionState::Error
            .transition(&SessionEvent::Playing)
            .unwrap_err();
        assert_eq!(err.from, SessionState::Error);
        assert_eq!(err.event, SessionEvent::Playing);
    }

    #[test]
    fn test_loaded_before_attach_is_rejected() {
        assert_matches!(
            SessionState::Idle.transition(&SessionEvent::Loaded),
            Err(InvalidTransition { .. })
        );
    }

    #[test]
    fn test_destroyed_is_terminal() {
        let state = SessionState::Playing
            .transition(&SessionEvent::Teardown)
            .unwrap();
        assert_eq!(state, SessionState::Destroyed);
        assert!(state.transition(&SessionEvent::Attach).is_err());
        assert_eq!(
            state.transition(&SessionEvent::Teardown),
            Ok(SessionState::Destroyed)
        );
    }

    #[test]
    fn test_loading_indicator() {
        assert!(SessionState::Attaching.is_loading());
        assert!(SessionState::Buffering.is_loading());
        assert!(!SessionState::Playing.is_loading());
        assert!(!SessionState::Error.is_loading());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Playing.to_string(), "playing");
        assert_eq!(
            SessionState::Recovering(RecoveryKind::Media).to_string(),
            "recovering(media)"
        );
    }
}
