use thiserror::Error;

use crate::dao::models::GameStatus;

/// Phases a scramble session goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// At least one hole is still open for strokes.
    Active,
    /// Every hole is finalized; the summary is shown but not committed yet.
    FinishPending,
    /// The summary was committed. Terminal.
    Completed,
}

/// Events that can be applied to the phase machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The current hole was finalized; `last` tells whether it was the final hole.
    HoleFinalized {
        /// Whether the finalized hole was the last one of the round.
        last: bool,
    },
    /// The caller confirmed the final summary.
    Complete,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the session was in when the event was received.
    pub from: SessionPhase,
    /// The event that cannot be applied from this phase.
    pub event: SessionEvent,
}

impl SessionPhase {
    /// Compute the phase reached by applying `event`, if the transition is valid.
    pub fn next(self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = match (self, event) {
            (SessionPhase::Active, SessionEvent::HoleFinalized { last: false }) => {
                SessionPhase::Active
            }
            (SessionPhase::Active, SessionEvent::HoleFinalized { last: true }) => {
                SessionPhase::FinishPending
            }
            (SessionPhase::FinishPending, SessionEvent::Complete) => SessionPhase::Completed,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }

    /// Persisted status matching this phase.
    pub fn status(self) -> GameStatus {
        match self {
            SessionPhase::Active | SessionPhase::FinishPending => GameStatus::Active,
            SessionPhase::Completed => GameStatus::Completed,
        }
    }

    /// Short machine-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Active => "active",
            SessionPhase::FinishPending => "finish_pending",
            SessionPhase::Completed => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_walks_to_completed() {
        let phase = SessionPhase::Active
            .next(SessionEvent::HoleFinalized { last: false })
            .unwrap();
        assert_eq!(phase, SessionPhase::Active);

        let phase = phase.next(SessionEvent::HoleFinalized { last: true }).unwrap();
        assert_eq!(phase, SessionPhase::FinishPending);
        assert_eq!(phase.status(), GameStatus::Active);

        let phase = phase.next(SessionEvent::Complete).unwrap();
        assert_eq!(phase, SessionPhase::Completed);
        assert_eq!(phase.status(), GameStatus::Completed);
    }

    #[test]
    fn completing_an_active_round_is_rejected() {
        let err = SessionPhase::Active.next(SessionEvent::Complete).unwrap_err();
        assert_eq!(err.from, SessionPhase::Active);
        assert_eq!(err.event, SessionEvent::Complete);
    }

    #[test]
    fn no_holes_after_finish() {
        assert!(
            SessionPhase::FinishPending
                .next(SessionEvent::HoleFinalized { last: true })
                .is_err()
        );
        assert!(SessionPhase::Completed.next(SessionEvent::Complete).is_err());
    }
}
