mod events;
mod plan;
mod progress;
mod round;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use events::{QuizEvent, ResetReason};
pub use plan::{SessionPlan, SessionSelector};
pub use progress::SessionProgress;
pub use round::{ChoiceSlot, RoundState, build_round};
pub use service::{GuessOutcome, QuizSession, SessionConfig, SessionPhase, Transition};
pub use workflow::{DEFAULT_ADVANCE_DELAY, QuizService};
