use crate::models::Match;
use crate::utils::status::DisplayStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Time remaining until a kickoff, split for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// All zero once `target` is not in the future
pub fn time_left(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeLeft {
    let total = (target - now).num_seconds();
    if total <= 0 {
        return TimeLeft::default();
    }
    TimeLeft {
        days: total / 86_400,
        hours: (total / 3_600) % 24,
        minutes: (total / 60) % 60,
        seconds: total % 60,
    }
}

/// Earliest upcoming match that has not kicked off yet
pub fn next_kickoff(matches: &[Match], now: DateTime<Utc>) -> Option<&Match> {
    matches
        .iter()
        .filter(|m| matches!(m.display_status(), Ok(DisplayStatus::Upcoming)))
        .filter(|m| m.kickoff() > now)
        .min_by_key(|m| m.kickoff())
}
