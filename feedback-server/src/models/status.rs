//! Suggestion workflow status and vote direction

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Where a suggestion sits on the roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionStatus {
    #[default]
    Suggestion,
    Planned,
    InProgress,
    Live,
}

impl SuggestionStatus {
    pub const ALL: [Self; 4] = [Self::Suggestion, Self::Planned, Self::InProgress, Self::Live];

    /// Get string representation (matches the `suggestions.status` column).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Live => "live",
        }
    }
}

impl FromStr for SuggestionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "status",
                value: s.to_owned(),
            })
    }
}

impl TryFrom<String> for SuggestionStatus {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a single vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteDirection {
    #[default]
    Up,
    Down,
}

impl VoteDirection {
    /// Amount added to the vote counter.
    pub fn delta(&self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Parse the `vote` query value. Missing or empty means up.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Up),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for VoteDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(ValidationError::InvalidVariant {
                field: "vote",
                value: other.to_owned(),
            }),
        }
    }
}
