use std::time::Duration;

use flagquiz_core::model::{OptionKey, SessionEpoch};

/// Why a new session was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    Started,
    Restarted,
    OptionChanged(OptionKey),
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    SessionReset {
        epoch: SessionEpoch,
        reason: ResetReason,
    },
    ChoicesUpdated {
        visible: usize,
        rows: usize,
    },
    RoundStarted {
        epoch: SessionEpoch,
        asset_id: String,
        question_number: usize,
        total: usize,
    },
    GuessFeedback {
        correct: bool,
        label: String,
        slot: usize,
    },
    /// The driver should call `advance(epoch)` once `delay` has elapsed.
    AdvanceScheduled {
        epoch: SessionEpoch,
        delay: Duration,
    },
    SessionComplete {
        total_guesses: u32,
        correct_guesses: u32,
        score: f64,
    },
}
