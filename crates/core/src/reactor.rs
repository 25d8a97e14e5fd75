//! Reaction to runtime option changes.
//!
//! Any accepted change requires a full session reset; a region change also
//! requires the filtered view to be rebuilt.

use crate::model::{ChoiceCount, OptionKey, QuizSettings, Region, SettingsError};

/// Outcome of applying one option change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    pub settings: QuizSettings,
    pub changed: OptionKey,
    /// The region changed, so the filtered view must be recomputed.
    pub refilter: bool,
    pub reset_required: bool,
}

/// Apply `raw` to `key` on top of `current`.
///
/// Choice counts are clamped into {2, 4, 6, 8}.
///
/// # Errors
///
/// Returns `SettingsError` if `raw` cannot be parsed for `key`.
pub fn on_config_changed(
    current: &QuizSettings,
    key: OptionKey,
    raw: &str,
) -> Result<ConfigChange, SettingsError> {
    let (settings, refilter) = match key {
        OptionKey::NumberOfChoices => {
            let choices: ChoiceCount = raw.parse()?;
            (current.clone().with_choices(choices), false)
        }
        OptionKey::Region => {
            let region: Region = raw.parse()?;
            (current.clone().with_region(region), true)
        }
    };

    Ok(ConfigChange {
        settings,
        changed: key,
        refilter,
        reset_required: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_change_clamps_and_resets() {
        let change =
            on_config_changed(&QuizSettings::default(), OptionKey::NumberOfChoices, "7").unwrap();
        assert_eq!(change.settings.choices(), ChoiceCount::Six);
        assert!(change.settings.region().is_all());
        assert!(!change.refilter);
        assert!(change.reset_required);
    }

    #[test]
    fn region_change_refilters_and_resets() {
        let current = QuizSettings::new(ChoiceCount::Eight, Region::All);
        let change = on_config_changed(&current, OptionKey::Region, "Oceania").unwrap();
        assert_eq!(change.settings.region(), &Region::named("Oceania"));
        assert_eq!(change.settings.choices(), ChoiceCount::Eight);
        assert!(change.refilter);
        assert!(change.reset_required);
    }

    #[test]
    fn unparsable_value_leaves_settings_alone() {
        let err =
            on_config_changed(&QuizSettings::default(), OptionKey::NumberOfChoices, "lots")
                .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidChoices { .. }));
    }
}
