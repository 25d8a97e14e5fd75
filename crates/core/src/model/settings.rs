use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use thiserror::Error;

/// Sentinel region value meaning "no filter".
pub const ALL_REGIONS: &str = "All";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("number of choices must be numeric, got {raw:?}")]
    InvalidChoices { raw: String },

    #[error("region cannot be empty")]
    EmptyRegion,

    #[error("unknown option key: {key}")]
    UnknownOption { key: String },
}

//
// ─── CHOICE COUNT ──────────────────────────────────────────────────────────────
//

/// Number of answer slots shown per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChoiceCount {
    Two,
    #[default]
    Four,
    Six,
    Eight,
}

impl ChoiceCount {
    pub const ALL: [ChoiceCount; 4] = [Self::Two, Self::Four, Self::Six, Self::Eight];

    /// Clamp an arbitrary count into the supported set.
    ///
    /// Values below 2 become 2, values above 8 become 8, odd values round down.
    #[must_use]
    pub fn clamped(raw: i64) -> Self {
        match raw.clamp(2, 8) {
            2 | 3 => Self::Two,
            4 | 5 => Self::Four,
            6 | 7 => Self::Six,
            _ => Self::Eight,
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Six => 6,
            Self::Eight => 8,
        }
    }

    /// Choice rows a two-column layout needs.
    #[must_use]
    pub fn rows(self) -> usize {
        self.get() / 2
    }
}

impl FromStr for ChoiceCount {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        match raw.parse::<i64>() {
            Ok(n) => Ok(Self::clamped(n)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(Self::Eight),
                IntErrorKind::NegOverflow => Ok(Self::Two),
                _ => Err(SettingsError::InvalidChoices {
                    raw: raw.to_owned(),
                }),
            },
        }
    }
}

impl fmt::Display for ChoiceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

//
// ─── REGION ────────────────────────────────────────────────────────────────────
//

/// Category selection for the region filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    All,
    Named(String),
}

impl Region {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl FromStr for Region {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(SettingsError::EmptyRegion),
            ALL_REGIONS => Ok(Self::All),
            name => Ok(Self::Named(name.to_owned())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_REGIONS),
            Self::Named(name) => f.write_str(name),
        }
    }
}

//
// ─── OPTION KEYS ───────────────────────────────────────────────────────────────
//

/// Runtime options the quiz reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    NumberOfChoices,
    Region,
}

impl OptionKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumberOfChoices => "numberOfChoices",
            Self::Region => "region",
        }
    }
}

impl FromStr for OptionKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "numberOfChoices" | "pref_numberOfChoices" | "choices" => Ok(Self::NumberOfChoices),
            "region" | "pref_regions" => Ok(Self::Region),
            other => Err(SettingsError::UnknownOption {
                key: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizSettings {
    choices: ChoiceCount,
    region: Region,
}

/// Raw key/value form of the settings, as read from args or the environment.
#[derive(Debug, Clone, Default)]
pub struct QuizSettingsDraft {
    pub choices: Option<String>,
    pub region: Option<String>,
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft; missing values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a present value cannot be parsed.
    pub fn validate(self) -> Result<QuizSettings, SettingsError> {
        let choices = normalize_optional(self.choices)
            .map(|raw| raw.parse::<ChoiceCount>())
            .transpose()?
            .unwrap_or_default();
        let region = normalize_optional(self.region)
            .map(|raw| raw.parse::<Region>())
            .transpose()?
            .unwrap_or_default();

        Ok(QuizSettings { choices, region })
    }
}

impl QuizSettings {
    #[must_use]
    pub fn new(choices: ChoiceCount, region: Region) -> Self {
        Self { choices, region }
    }

    #[must_use]
    pub fn choices(&self) -> ChoiceCount {
        self.choices
    }

    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub fn with_choices(mut self, choices: ChoiceCount) -> Self {
        self.choices = choices;
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_clamp_to_supported_set() {
        assert_eq!("0".parse::<ChoiceCount>().unwrap(), ChoiceCount::Two);
        assert_eq!("2".parse::<ChoiceCount>().unwrap(), ChoiceCount::Two);
        assert_eq!("5".parse::<ChoiceCount>().unwrap(), ChoiceCount::Four);
        assert_eq!(" 6 ".parse::<ChoiceCount>().unwrap(), ChoiceCount::Six);
        assert_eq!("12".parse::<ChoiceCount>().unwrap(), ChoiceCount::Eight);
        assert_eq!(ChoiceCount::Eight.rows(), 4);
    }

    #[test]
    fn out_of_range_choices_clamp_to_nearest_bound() {
        assert_eq!(
            "99999999999999999999".parse::<ChoiceCount>().unwrap(),
            ChoiceCount::Eight
        );
        assert_eq!(
            "-99999999999999999999".parse::<ChoiceCount>().unwrap(),
            ChoiceCount::Two
        );
        assert!("".parse::<ChoiceCount>().is_err());
    }

    #[test]
    fn non_numeric_choices_rejected() {
        let err = "many".parse::<ChoiceCount>().unwrap_err();
        assert_eq!(
            err,
            SettingsError::InvalidChoices {
                raw: "many".into()
            }
        );
    }

    #[test]
    fn region_sentinel_and_names() {
        assert_eq!("All".parse::<Region>().unwrap(), Region::All);
        assert_eq!("Europe".parse::<Region>().unwrap(), Region::named("Europe"));
        assert_eq!("  ".parse::<Region>().unwrap_err(), SettingsError::EmptyRegion);
        assert_eq!(Region::All.to_string(), "All");
    }

    #[test]
    fn option_keys_accept_preference_aliases() {
        assert_eq!(
            "pref_numberOfChoices".parse::<OptionKey>().unwrap(),
            OptionKey::NumberOfChoices
        );
        assert_eq!("pref_regions".parse::<OptionKey>().unwrap(), OptionKey::Region);
        assert!("volume".parse::<OptionKey>().is_err());
    }

    #[test]
    fn draft_defaults_when_missing() {
        let settings = QuizSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, QuizSettings::default());
        assert_eq!(settings.choices(), ChoiceCount::Four);
        assert!(settings.region().is_all());

        let settings = QuizSettingsDraft {
            choices: Some("8".into()),
            region: Some("Africa".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(settings.choices(), ChoiceCount::Eight);
        assert_eq!(settings.region(), &Region::named("Africa"));
    }
}
