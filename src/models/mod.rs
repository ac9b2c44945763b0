pub mod group;
pub mod user;

pub use group::*;
pub use user::*;

use crate::error::ProdeError;
use crate::utils::status::{display_status, DisplayStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Highest goal count the prediction form accepts per side
pub const MAX_PREDICTED_GOALS: u32 = 20;

/// A validated, non-negative goal pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// Qualitative result of a match, independent of the exact score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tendency {
    HomeWin,
    Draw,
    AwayWin,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Build a score from optional wire values, rejecting missing or negative goals
    pub fn from_wire(home: Option<i32>, away: Option<i32>) -> Result<Self, ProdeError> {
        match (home, away) {
            (Some(home), Some(away)) => {
                let home = u32::try_from(home).map_err(|_| {
                    ProdeError::InvalidInput(format!("negative home score {}", home))
                })?;
                let away = u32::try_from(away).map_err(|_| {
                    ProdeError::InvalidInput(format!("negative away score {}", away))
                })?;
                Ok(Self { home, away })
            }
            _ => Err(ProdeError::InvalidInput("missing score".to_string())),
        }
    }

    /// Home goals minus away goals
    pub fn goal_difference(&self) -> i64 {
        self.home as i64 - self.away as i64
    }

    pub fn tendency(&self) -> Tendency {
        match self.home.cmp(&self.away) {
            Ordering::Greater => Tendency::HomeWin,
            Ordering::Equal => Tendency::Draw,
            Ordering::Less => Tendency::AwayWin,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Parses "2-1" or "2:1"
impl FromStr for Score {
    type Err = ProdeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (home, away) = s
            .split_once(['-', ':'])
            .ok_or_else(|| ProdeError::InvalidInput(format!("expected HOME-AWAY, got {:?}", s)))?;
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                ProdeError::InvalidInput(format!("bad goal count {:?} in {:?}", part, s))
            })
        };
        Ok(Self::new(parse(home)?, parse(away)?))
    }
}

/// A match as the predictor backend sends it.
///
/// `status` keeps the raw wire vocabulary (`upcoming | live | finished`) so that
/// values outside it survive decoding and can be rejected at display time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_flag: Option<String>,
    pub away_flag: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub status: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub match_number: Option<u32>,
    pub stage: Option<String>,
    pub group: Option<String>,
    pub stadium: Option<String>,
    pub city: Option<String>,
    pub user_prediction: Option<Prediction>,
}

impl Match {
    /// Status in display vocabulary, `UnknownStatus` if the wire value is not recognised
    pub fn display_status(&self) -> Result<DisplayStatus, ProdeError> {
        display_status(&self.status)
    }

    /// Final score; only meaningful once the match is finished
    pub fn final_score(&self) -> Result<Score, ProdeError> {
        match self.display_status()? {
            DisplayStatus::Finished => Score::from_wire(self.home_score, self.away_score),
            _ => Err(ProdeError::MatchNotFinished(self.id.clone())),
        }
    }

    /// Kickoff in UTC. Matches without a time are taken to start at midnight.
    pub fn kickoff(&self) -> DateTime<Utc> {
        let time = self
            .time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
            .unwrap_or_default();
        NaiveDateTime::new(self.date, time).and_utc()
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// A user's predicted score for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: Option<String>,
    pub match_id: String,
    pub user_id: String,
    pub home_score: i32,
    pub away_score: i32,
    pub points: Option<i32>,
}

impl Prediction {
    pub fn score(&self) -> Result<Score, ProdeError> {
        Score::from_wire(Some(self.home_score), Some(self.away_score))
    }
}

/// Body of `POST /predictions`, validated against the form limits
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDraft {
    pub match_id: String,
    pub home_score: u32,
    pub away_score: u32,
}

impl PredictionDraft {
    pub fn new(match_id: impl Into<String>, home: i32, away: i32) -> Result<Self, ProdeError> {
        Self::from_score(match_id, Score::from_wire(Some(home), Some(away))?)
    }

    pub fn from_score(match_id: impl Into<String>, score: Score) -> Result<Self, ProdeError> {
        if score.home > MAX_PREDICTED_GOALS || score.away > MAX_PREDICTED_GOALS {
            return Err(ProdeError::InvalidInput(format!(
                "predicted goals must be at most {}",
                MAX_PREDICTED_GOALS
            )));
        }
        Ok(Self {
            match_id: match_id.into(),
            home_score: score.home,
            away_score: score.away,
        })
    }
}

/// Accepts RFC 3339 timestamps as well as naive ISO timestamps, which are taken as UTC
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {:?}", raw)))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn match_with(id: &str, status: &str, score: Option<(i32, i32)>) -> Match {
        Match {
            id: id.to_string(),
            home_team: format!("{} home", id),
            away_team: format!("{} away", id),
            home_flag: None,
            away_flag: None,
            date: NaiveDate::from_ymd_opt(2026, 6, 11).unwrap(),
            time: Some("19:00".to_string()),
            status: status.to_string(),
            home_score: score.map(|(h, _)| h),
            away_score: score.map(|(_, a)| a),
            match_number: None,
            stage: None,
            group: None,
            stadium: None,
            city: None,
            user_prediction: None,
        }
    }

    pub fn prediction(user_id: &str, match_id: &str, home: i32, away: i32) -> Prediction {
        Prediction {
            id: Some(format!("{}-{}", user_id, match_id)),
            match_id: match_id.to_string(),
            user_id: user_id.to_string(),
            home_score: home,
            away_score: away,
            points: None,
        }
    }
}
