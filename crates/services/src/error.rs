//! Shared error types for the services crate.

use thiserror::Error;

use flagquiz_core::model::{FilterError, SessionSummaryError, SettingsError};
use storage::StorageError;

/// Errors emitted by the session selector, round engine and session state machine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("pool has {available} usable entities, {required} required")]
    InsufficientPool { available: usize, required: usize },
    #[error("session queue is empty")]
    EmptySession,
    #[error("no session has been started")]
    NotStarted,
    #[error("session already completed")]
    Completed,
    #[error("round already answered, waiting to advance")]
    AwaitingAdvance,
    #[error("choice slot {index} out of range (0..{len})")]
    InvalidSlot { index: usize, len: usize },
    #[error("choice slot {index} is disabled")]
    SlotDisabled { index: usize },
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
