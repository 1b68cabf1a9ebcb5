use crate::domain::error::DataValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User-chosen weighting scheme for the recommendation score.
///
/// The set is closed: anything outside these three is rejected while parsing, so the scorer
/// never sees an unmatched preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preference {
    RateFocused,
    TermFocused,
    SavingsPreferred,
}

impl Preference {
    pub const ALL: [Preference; 3] = [
        Preference::RateFocused,
        Preference::TermFocused,
        Preference::SavingsPreferred,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Preference::RateFocused => "rate-focused",
            Preference::TermFocused => "term-focused",
            Preference::SavingsPreferred => "savings-preferred",
        }
    }

    pub fn label_ko(self) -> &'static str {
        match self {
            Preference::RateFocused => "금리 중심",
            Preference::TermFocused => "기간 중심",
            Preference::SavingsPreferred => "적금 선호",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = DataValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Preference::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s) || p.label_ko() == s)
            .ok_or_else(|| DataValidationError::invalid("preference", s))
    }
}
