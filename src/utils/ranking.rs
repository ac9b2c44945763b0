use crate::models::{GroupMember, Match, Prediction};
use crate::utils::grader::{award_match, Outcome, ScoringProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One row of a group standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub position: u32,
    pub user_id: String,
    pub name: String,
    pub points: u32,
    pub exact_hits: u32,
    pub tendency_hits: u32,
    pub graded: u32,
}

impl RankingEntry {
    pub fn format(&self) -> String {
        format!(
            "{:>3}. {:<24} {:>4} pts | exact: {} | winner: {} | graded: {}",
            self.position, self.name, self.points, self.exact_hits, self.tendency_hits, self.graded
        )
    }
}

/// Grade every member's predictions against the finished matches and rank them.
///
/// Order is points, then exact hits (both descending), then name. Predictions
/// for matches that are not finished or carry bad data are skipped.
pub fn compute_ranking(
    members: &[GroupMember],
    matches: &[Match],
    predictions: &[Prediction],
    profile: &ScoringProfile,
) -> Vec<RankingEntry> {
    let matches_by_id: HashMap<&str, &Match> = matches.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut entries: Vec<RankingEntry> = members
        .iter()
        .map(|member| {
            let mut entry = RankingEntry {
                position: 0,
                user_id: member.user_id.clone(),
                name: member.name.clone(),
                points: 0,
                exact_hits: 0,
                tendency_hits: 0,
                graded: 0,
            };

            for prediction in predictions.iter().filter(|p| p.user_id == member.user_id) {
                let Some(m) = matches_by_id.get(prediction.match_id.as_str()) else {
                    continue;
                };
                match award_match(m, prediction, profile) {
                    Ok(grade) => {
                        entry.points += grade.points;
                        entry.graded += 1;
                        match grade.outcome {
                            Outcome::Exact => entry.exact_hits += 1,
                            Outcome::CorrectTendency => entry.tendency_hits += 1,
                            Outcome::Miss => {}
                        }
                    }
                    Err(e) => debug!("Skipping {} for {}: {}", m.title(), member.name, e),
                }
            }

            entry
        })
        .collect();

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.exact_hits.cmp(&a.exact_hits))
            .then_with(|| a.name.cmp(&b.name))
    });

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.position = i as u32 + 1;
    }

    entries
}

/// Order members by the points the server stored and number them
pub fn rank_members(mut members: Vec<GroupMember>) -> Vec<GroupMember> {
    members.sort_by(|a, b| b.points.cmp(&a.points));
    for (i, member) in members.iter_mut().enumerate() {
        member.position = Some(i as u32 + 1);
    }
    members
}

/// Standings built from the points the server stored, for groups with nothing graded locally
pub fn stored_ranking(members: Vec<GroupMember>) -> Vec<RankingEntry> {
    rank_members(members)
        .into_iter()
        .enumerate()
        .map(|(i, m)| RankingEntry {
            position: m.position.unwrap_or(i as u32 + 1),
            user_id: m.user_id,
            name: m.name,
            points: m.points.clamp(0, u32::MAX as i64) as u32,
            exact_hits: 0,
            tendency_hits: 0,
            graded: 0,
        })
        .collect()
}
