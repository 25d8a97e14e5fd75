use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use std::fmt;

use flagquiz_core::SESSION_SIZE;
use flagquiz_core::model::{ChoiceCount, FilteredView, Score, SessionEpoch, SessionSummary};

use super::plan::{SessionPlan, SessionSelector};
use super::progress::SessionProgress;
use super::round::{RoundState, build_round, ensure_round_pool};
use crate::error::SessionError;

//
// ─── CONFIG & OUTCOMES ─────────────────────────────────────────────────────────
//

/// Sizing for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub choices: ChoiceCount,
    pub session_size: usize,
}

impl SessionConfig {
    #[must_use]
    pub fn new(choices: ChoiceCount) -> Self {
        Self {
            choices,
            session_size: SESSION_SIZE,
        }
    }

    #[must_use]
    pub fn with_session_size(mut self, session_size: usize) -> Self {
        self.session_size = session_size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// The current round accepts guesses.
    Guessing,
    /// The round was answered; waiting for `advance` with the session epoch.
    AwaitingAdvance,
    Complete,
}

/// What happens after a guess.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Wrong guess; the round stays open.
    Retry,
    /// Correct guess; the next round starts on `advance(epoch)`.
    Advance { epoch: SessionEpoch },
    Complete(SessionSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub slot: usize,
    pub correct: bool,
    pub label: String,
    pub score: Score,
    pub transition: Transition,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz run: its queue of prompts, the active round and the guess counters.
///
/// A session is never reused across a reset; the owner replaces it together with
/// its epoch, so deferred advances tagged with an old epoch become no-ops.
pub struct QuizSession {
    epoch: SessionEpoch,
    config: SessionConfig,
    view: FilteredView,
    plan: SessionPlan,
    round: RoundState,
    score: Score,
    phase: SessionPhase,
    started_at: DateTime<Utc>,
    summary: Option<SessionSummary>,
    rng: StdRng,
}

impl QuizSession {
    /// Select the session's prompts from `view` and open the first round.
    ///
    /// Every selected prompt is checked against the round size up front so a
    /// session cannot stall halfway through.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySession` for a zero session size and
    /// `SessionError::InsufficientPool` if `view` cannot fill the session or a round.
    pub fn start(
        mut view: FilteredView,
        config: SessionConfig,
        epoch: SessionEpoch,
        started_at: DateTime<Utc>,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        if config.session_size == 0 {
            return Err(SessionError::EmptySession);
        }

        let mut plan = SessionSelector::new(config.session_size).select(view.as_slice(), &mut rng)?;
        for entity in plan.iter() {
            ensure_round_pool(view.as_slice(), entity, config.choices)?;
        }
        let round = build_round(&mut plan, &mut view, config.choices, 1, &mut rng)?;

        log::info!(
            "session {epoch} started: {} prompts from {} entities in {}",
            config.session_size,
            view.len(),
            view.region()
        );

        Ok(Self {
            epoch,
            config,
            view,
            plan,
            round,
            score: Score::new(),
            phase: SessionPhase::Guessing,
            started_at,
            summary: None,
            rng,
        })
    }

    #[must_use]
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    #[must_use]
    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Prompts not yet asked.
    #[must_use]
    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    #[must_use]
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            question_number: self.round.question_number(),
            total: self.config.session_size,
            total_guesses: self.score.total_guesses(),
            correct_guesses: self.score.correct_guesses(),
            is_complete: self.is_complete(),
        }
    }

    /// Guess the label in `slot`.
    ///
    /// A correct guess disables every slot and either completes the session or
    /// asks for an advance; a wrong guess disables only `slot`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` or `SessionError::AwaitingAdvance` if the
    /// round no longer accepts guesses, `SessionError::InvalidSlot` or
    /// `SessionError::SlotDisabled` for an unusable slot. Rejected guesses are not counted.
    pub fn submit_guess(
        &mut self,
        slot: usize,
        at: DateTime<Utc>,
    ) -> Result<GuessOutcome, SessionError> {
        match self.phase {
            SessionPhase::Complete => return Err(SessionError::Completed),
            SessionPhase::AwaitingAdvance => return Err(SessionError::AwaitingAdvance),
            SessionPhase::Guessing => {}
        }

        let len = self.round.slots().len();
        let chosen = self
            .round
            .slots()
            .get(slot)
            .ok_or(SessionError::InvalidSlot { index: slot, len })?;
        if !chosen.is_enabled() {
            return Err(SessionError::SlotDisabled { index: slot });
        }

        let label = chosen.label().to_owned();
        let correct = self.round.is_correct_label(&label);
        self.score.record(correct);

        let transition = if correct {
            self.round.disable_all();
            if self.score.is_complete(self.config.session_size) {
                let summary =
                    SessionSummary::from_score(self.epoch, self.started_at, at, &self.score)?;
                log::info!(
                    "session {} complete: {} guesses, score {:.2}",
                    self.epoch,
                    summary.total_guesses(),
                    summary.score()
                );
                self.phase = SessionPhase::Complete;
                self.summary = Some(summary.clone());
                Transition::Complete(summary)
            } else {
                self.phase = SessionPhase::AwaitingAdvance;
                Transition::Advance { epoch: self.epoch }
            }
        } else {
            self.round.disable(slot);
            Transition::Retry
        };

        Ok(GuessOutcome {
            slot,
            correct,
            label,
            score: self.score,
            transition,
        })
    }

    /// Open the next round if an advance for this session's epoch is pending.
    ///
    /// Returns `Ok(None)` for a stale epoch or when no advance is pending, so a
    /// superseded delayed callback is harmless.
    ///
    /// # Errors
    ///
    /// Propagates round-building errors.
    pub fn advance(&mut self, epoch: SessionEpoch) -> Result<Option<&RoundState>, SessionError> {
        if epoch != self.epoch {
            log::debug!("discarding advance for stale session {epoch} (current {})", self.epoch);
            return Ok(None);
        }
        if self.phase != SessionPhase::AwaitingAdvance {
            log::debug!("ignoring advance for session {epoch} in phase {:?}", self.phase);
            return Ok(None);
        }

        let question_number = usize::try_from(self.score.correct_guesses())
            .unwrap_or(usize::MAX)
            .saturating_add(1);
        self.round = build_round(
            &mut self.plan,
            &mut self.view,
            self.config.choices,
            question_number,
            &mut self.rng,
        )?;
        self.phase = SessionPhase::Guessing;
        Ok(Some(&self.round))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("epoch", &self.epoch)
            .field("config", &self.config)
            .field("view_len", &self.view.len())
            .field("remaining", &self.plan.len())
            .field("score", &self.score)
            .field("phase", &self.phase)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
