use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Light/dark UI preference. Out of the core's business logic, but
/// persisted alongside everything else so the shell can restore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemePreference::Light => write!(f, "light"),
            ThemePreference::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for ThemePreference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(CoreError::ValidationError(format!(
                "Unknown theme '{other}'"
            ))),
        }
    }
}

/// Hours (0–23) at which the daily entry reminder fires by default:
/// one nudge in the evening, one late recap.
pub const DEFAULT_REMINDER_HOURS: [u8; 2] = [19, 22];
