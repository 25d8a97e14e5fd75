use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

use flagquiz_core::model::{Catalog, FilteredView, OptionKey, QuizSettings, SessionEpoch};
use flagquiz_core::{Clock, SESSION_SIZE, on_config_changed};
use storage::{Asset, AssetResolver, CatalogRepository};

use super::events::{QuizEvent, ResetReason};
use super::round::RoundState;
use super::service::{QuizSession, SessionConfig, Transition};
use crate::error::{QuizServiceError, SessionError};

/// Pause between a correct guess and the next prompt.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_secs(2);

/// Drives quiz sessions over a loaded catalog and the current settings.
///
/// Every operation returns the events the presentation layer should render.
/// Resets always build a fresh `QuizSession` under a new epoch.
#[derive(Debug)]
pub struct QuizService {
    clock: Clock,
    catalog: Arc<Catalog>,
    settings: QuizSettings,
    session_size: usize,
    advance_delay: Duration,
    rng: StdRng,
    last_epoch: SessionEpoch,
    view: Option<FilteredView>,
    session: Option<QuizSession>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, settings: QuizSettings) -> Self {
        Self {
            clock,
            catalog,
            settings,
            session_size: SESSION_SIZE,
            advance_delay: DEFAULT_ADVANCE_DELAY,
            rng: StdRng::from_rng(&mut rand::rng()),
            last_epoch: SessionEpoch::default(),
            view: None,
            session: None,
        }
    }

    /// Load the catalog from `source` and build an idle service.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the catalog cannot be loaded.
    pub async fn load(
        clock: Clock,
        source: &dyn CatalogRepository,
        settings: QuizSettings,
    ) -> Result<Self, QuizServiceError> {
        let catalog = source.load_catalog().await?;
        Ok(Self::new(clock, Arc::new(catalog), settings))
    }

    /// Seed all randomness for reproducible sessions.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_session_size(mut self, session_size: usize) -> Self {
        self.session_size = session_size;
        self
    }

    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn current_epoch(&self) -> Option<SessionEpoch> {
        self.session.as_ref().map(QuizSession::epoch)
    }

    /// Start the first session.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Filter` for an empty region and
    /// `QuizServiceError::Session` if the region is too small to play.
    pub fn start(&mut self) -> Result<Vec<QuizEvent>, QuizServiceError> {
        self.reset(ResetReason::Started, self.settings.clone(), true)
    }

    /// Start over with the same settings, e.g. after a completed session.
    ///
    /// # Errors
    ///
    /// See [`QuizService::start`].
    pub fn restart(&mut self) -> Result<Vec<QuizEvent>, QuizServiceError> {
        self.reset(ResetReason::Restarted, self.settings.clone(), false)
    }

    /// Apply a runtime option change and reset the session.
    ///
    /// On error the running session and settings are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Settings` for an unparsable value, otherwise as
    /// [`QuizService::start`].
    pub fn change_option(
        &mut self,
        key: OptionKey,
        raw: &str,
    ) -> Result<Vec<QuizEvent>, QuizServiceError> {
        let change = on_config_changed(&self.settings, key, raw)?;
        let events = self.reset(ResetReason::OptionChanged(key), change.settings, change.refilter)?;
        log::info!("{key} set to {raw:?}; quiz restarted");
        Ok(events)
    }

    /// Guess the label in `slot` of the current round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`, otherwise the session's
    /// guess errors.
    pub fn guess(&mut self, slot: usize) -> Result<Vec<QuizEvent>, QuizServiceError> {
        let at = self.clock.now();
        let session = self.session.as_mut().ok_or(SessionError::NotStarted)?;
        let outcome = session.submit_guess(slot, at)?;

        let mut events = vec![QuizEvent::GuessFeedback {
            correct: outcome.correct,
            label: outcome.label,
            slot: outcome.slot,
        }];
        match outcome.transition {
            Transition::Retry => {}
            Transition::Advance { epoch } => events.push(QuizEvent::AdvanceScheduled {
                epoch,
                delay: self.advance_delay,
            }),
            Transition::Complete(summary) => events.push(QuizEvent::SessionComplete {
                total_guesses: summary.total_guesses(),
                correct_guesses: summary.correct_guesses(),
                score: summary.score(),
            }),
        }
        Ok(events)
    }

    /// Deliver a scheduled advance. Stale epochs produce no events.
    ///
    /// # Errors
    ///
    /// Propagates round-building errors.
    pub fn advance(&mut self, epoch: SessionEpoch) -> Result<Vec<QuizEvent>, QuizServiceError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Vec::new());
        };
        let total = session.config().session_size;
        Ok(session
            .advance(epoch)?
            .map(|round| vec![round_started(epoch, round, total)])
            .unwrap_or_default())
    }

    /// Resolve the current prompt's image.
    ///
    /// Failures are logged and yield `None`; the round goes on without an image.
    pub async fn prompt_asset(&self, assets: &dyn AssetResolver) -> Option<Asset> {
        let asset_id = self.session.as_ref()?.round().correct().asset_id();
        match assets.resolve(asset_id).await {
            Ok(asset) => Some(asset),
            Err(err) => {
                log::warn!("could not load asset {asset_id}: {err}");
                None
            }
        }
    }

    fn reset(
        &mut self,
        reason: ResetReason,
        settings: QuizSettings,
        refilter: bool,
    ) -> Result<Vec<QuizEvent>, QuizServiceError> {
        let view = match &self.view {
            Some(view) if !refilter => view.clone(),
            _ => self.catalog.filter(settings.region())?,
        };

        let epoch = self.last_epoch.next();
        let config = SessionConfig::new(settings.choices()).with_session_size(self.session_size);
        let session = QuizSession::start(
            view.clone(),
            config,
            epoch,
            self.clock.now(),
            StdRng::from_rng(&mut self.rng),
        )?;

        let events = vec![
            QuizEvent::SessionReset { epoch, reason },
            QuizEvent::ChoicesUpdated {
                visible: settings.choices().get(),
                rows: settings.choices().rows(),
            },
            round_started(epoch, session.round(), config.session_size),
        ];

        self.last_epoch = epoch;
        self.settings = settings;
        self.view = Some(view);
        self.session = Some(session);
        Ok(events)
    }
}

fn round_started(epoch: SessionEpoch, round: &RoundState, total: usize) -> QuizEvent {
    QuizEvent::RoundStarted {
        epoch,
        asset_id: round.correct().asset_id().to_owned(),
        question_number: round.question_number(),
        total,
    }
}
