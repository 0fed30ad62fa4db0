//! Run state machine.
//!
//! # States
//! ```text
//! Unconfigured → Configured → Bound → Sent(Pending) → Sent(Confirmed | Failed)
//!     → Queried → Done
//! any non-terminal state → Aborted(reason)
//! ```
//!
//! `Done` and `Aborted` are terminal. Transitions are logged.

use crate::blockchain::ConfirmationStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Unconfigured,
    Configured,
    Bound,
    Sent(ConfirmationStatus),
    Queried,
    Done,
    Aborted(String),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Aborted(_))
    }

    /// Whether `next` may follow `self`.
    pub fn can_transition_to(&self, next: &RunState) -> bool {
        use ConfirmationStatus::{Confirmed, Failed, Pending};
        use RunState::*;

        match (self, next) {
            (Done, _) | (Aborted(_), _) => false,
            (_, Aborted(_)) => true,
            (Unconfigured, Configured) => true,
            (Configured, Bound) => true,
            (Bound, Sent(Pending)) => true,
            (Sent(Pending), Sent(Confirmed { .. })) => true,
            (Sent(Pending), Sent(Failed(_))) => true,
            (Sent(Confirmed { .. }), Queried) => true,
            (Queried, Done) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RunState::Unconfigured => "unconfigured",
            RunState::Configured => "configured",
            RunState::Bound => "bound",
            RunState::Sent(ConfirmationStatus::Pending) => "sent(pending)",
            RunState::Sent(ConfirmationStatus::Confirmed { .. }) => "sent(confirmed)",
            RunState::Sent(ConfirmationStatus::Failed(_)) => "sent(failed)",
            RunState::Queried => "queried",
            RunState::Done => "done",
            RunState::Aborted(_) => "aborted",
        }
    }
}
