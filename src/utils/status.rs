use crate::error::ProdeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Match status as the display layer understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Upcoming,
    InProgress,
    Finished,
}

/// Map a wire status (`upcoming | live | finished`) into display vocabulary
/// (`upcoming | in_progress | finished`).
/// Only `live` is renamed; any other value passes through untouched.
pub fn reconcile_status(wire: &str) -> &str {
    match wire {
        "live" => "in_progress",
        other => other,
    }
}

/// Reconcile and parse in one step
pub fn display_status(wire: &str) -> Result<DisplayStatus, ProdeError> {
    reconcile_status(wire).parse()
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Upcoming => "upcoming",
            DisplayStatus::InProgress => "in_progress",
            DisplayStatus::Finished => "finished",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Upcoming => "Upcoming",
            DisplayStatus::InProgress => "In progress",
            DisplayStatus::Finished => "Finished",
        }
    }

    /// Final scores are only shown once the match is over
    pub fn shows_score(&self) -> bool {
        matches!(self, DisplayStatus::Finished)
    }
}

impl FromStr for DisplayStatus {
    type Err = ProdeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(DisplayStatus::Upcoming),
            "in_progress" => Ok(DisplayStatus::InProgress),
            "finished" => Ok(DisplayStatus::Finished),
            other => Err(ProdeError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
