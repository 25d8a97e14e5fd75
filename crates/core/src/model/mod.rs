mod catalog;
mod entity;
mod ids;
mod score;
mod session;
mod settings;

pub use catalog::{Catalog, CatalogError, FilterError, FilteredView};
pub use entity::{ASSET_EXTENSION, Entity};
pub use ids::SessionEpoch;
pub use score::{SCORE_POINTS, SESSION_SIZE, Score, ScoreError};
pub use session::{SessionSummary, SessionSummaryError};
pub use settings::{
    ALL_REGIONS, ChoiceCount, OptionKey, QuizSettings, QuizSettingsDraft, Region, SettingsError,
};
