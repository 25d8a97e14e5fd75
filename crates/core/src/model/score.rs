use thiserror::Error;

/// Number of prompts in one quiz session.
pub const SESSION_SIZE: usize = 10;

/// Points split across all guesses of a finished session.
pub const SCORE_POINTS: f64 = 1000.0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("cannot score a session with no guesses")]
    NoGuesses,
}

/// Running guess counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    total_guesses: u32,
    correct_guesses: u32,
}

impl Score {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one guess.
    pub fn record(&mut self, correct: bool) {
        self.total_guesses = self.total_guesses.saturating_add(1);
        if correct {
            self.correct_guesses = self.correct_guesses.saturating_add(1);
        }
    }

    #[must_use]
    pub fn total_guesses(&self) -> u32 {
        self.total_guesses
    }

    #[must_use]
    pub fn correct_guesses(&self) -> u32 {
        self.correct_guesses
    }

    /// True once `session_size` prompts have been answered correctly.
    #[must_use]
    pub fn is_complete(&self, session_size: usize) -> bool {
        usize::try_from(self.correct_guesses).is_ok_and(|correct| correct >= session_size)
    }

    /// Points-per-guess score: `1000 / total_guesses`.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::NoGuesses` if nothing has been guessed yet.
    pub fn final_score(&self) -> Result<f64, ScoreError> {
        if self.total_guesses == 0 {
            return Err(ScoreError::NoGuesses);
        }
        Ok(SCORE_POINTS / f64::from(self.total_guesses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_guess() {
        let mut score = Score::new();
        score.record(false);
        score.record(true);
        score.record(false);
        assert_eq!(score.total_guesses(), 3);
        assert_eq!(score.correct_guesses(), 1);
    }

    #[test]
    fn perfect_session_scores_one_hundred() {
        let mut score = Score::new();
        for _ in 0..SESSION_SIZE {
            score.record(true);
        }
        assert!(score.is_complete(SESSION_SIZE));
        assert!((score.final_score().unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_score_cannot_be_finalized() {
        assert_eq!(Score::new().final_score(), Err(ScoreError::NoGuesses));
    }
}
