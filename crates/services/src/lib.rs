#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use flagquiz_core::Clock;
pub use sessions as session;

pub use error::{QuizServiceError, SessionError};

pub use sessions::{
    ChoiceSlot, GuessOutcome, QuizEvent, QuizService, QuizSession, ResetReason, RoundState,
    SessionConfig, SessionPhase, SessionPlan, SessionProgress, SessionSelector, Transition,
    DEFAULT_ADVANCE_DELAY,
};
