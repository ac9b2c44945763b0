use crate::models::Match;
use crate::utils::edit_gate::EditGate;
use crate::utils::flags::team_flag;
use crate::utils::grader::{award_match, ScoringProfile};
use crate::utils::status::DisplayStatus;
use serde::Serialize;

/// A match prepared for display: status reconciled, edit control decided,
/// score shown only when it can be trusted
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_flag: String,
    pub away_flag: String,
    pub kickoff: String,
    pub stage: String,
    pub status: Option<DisplayStatus>,
    pub status_label: String,
    pub score: Option<String>,
    pub prediction: Option<String>,
    pub can_predict: bool,
    pub points: Option<u32>,
}

impl MatchView {
    /// `profile` grades the attached prediction once the match is finished
    pub fn new(m: &Match, gate: EditGate, profile: Option<&ScoringProfile>) -> Self {
        let status = m.display_status().ok();

        // Unknown statuses are non-actionable: no edit control, no score
        let can_predict = status == Some(DisplayStatus::Upcoming) && gate.is_open();
        let score = match status {
            Some(s) if s.shows_score() => m.final_score().ok().map(|s| s.to_string()),
            _ => None,
        };
        let points = match (profile, &m.user_prediction) {
            (Some(profile), Some(p)) => award_match(m, p, profile).ok().map(|g| g.points),
            _ => None,
        };

        Self {
            id: m.id.clone(),
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            home_flag: m
                .home_flag
                .clone()
                .unwrap_or_else(|| team_flag(Some(&m.home_team)).to_string()),
            away_flag: m
                .away_flag
                .clone()
                .unwrap_or_else(|| team_flag(Some(&m.away_team)).to_string()),
            kickoff: m.kickoff().format("%Y-%m-%d %H:%M UTC").to_string(),
            stage: m
                .group
                .clone()
                .or_else(|| m.stage.clone())
                .unwrap_or_default(),
            status,
            status_label: status
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| format!("Unavailable ({})", m.status)),
            score,
            prediction: m
                .user_prediction
                .as_ref()
                .map(|p| format!("{}-{}", p.home_score, p.away_score)),
            can_predict,
            points,
        }
    }

    pub fn format(&self) -> String {
        let score = self.score.as_deref().unwrap_or("-");
        let prediction = self.prediction.as_deref().unwrap_or("none");
        let lock = if self.can_predict { "open" } else { "locked" };
        format!(
            "{} {} vs {} {} | {} | {} | score: {} | prediction: {} ({})",
            self.home_flag,
            self.home_team,
            self.away_team,
            self.away_flag,
            self.kickoff,
            self.status_label,
            score,
            prediction,
            lock
        )
    }
}
