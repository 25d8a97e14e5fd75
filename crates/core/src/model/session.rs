use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::SessionEpoch;
use crate::model::score::{Score, ScoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct guesses ({correct}) exceed total guesses ({total})")]
    CountMismatch { total: u32, correct: u32 },

    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Final result of a completed quiz session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    epoch: SessionEpoch,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_guesses: u32,
    correct_guesses: u32,
    score: f64,
}

impl SessionSummary {
    /// Build a summary from the final guess counters.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::Score` if no guesses were made.
    pub fn from_score(
        epoch: SessionEpoch,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        score: &Score,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if score.correct_guesses() > score.total_guesses() {
            return Err(SessionSummaryError::CountMismatch {
                total: score.total_guesses(),
                correct: score.correct_guesses(),
            });
        }

        Ok(Self {
            epoch,
            started_at,
            completed_at,
            total_guesses: score.total_guesses(),
            correct_guesses: score.correct_guesses(),
            score: score.final_score()?,
        })
    }

    #[must_use]
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_guesses(&self) -> u32 {
        self.total_guesses
    }

    #[must_use]
    pub fn correct_guesses(&self) -> u32 {
        self.correct_guesses
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}
