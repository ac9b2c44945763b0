use crate::models::{Group, GroupMember, GroupStatus, Match, Prediction, User};
use crate::utils::grader::{grade_match, Outcome};
use crate::utils::status::DisplayStatus;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Counters from `/admin/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u32,
    pub total_groups: u32,
    pub active_matches: u32,
    pub predictions_today: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReport {
    pub total: u32,
    pub admins: u32,
    pub platform_admins: u32,
    pub players: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopGroup {
    pub name: String,
    pub member_count: u32,
    pub prediction_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub total: u32,
    pub active: u32,
    pub avg_members: f64,
    pub largest_group: u32,
    pub new_this_week: u32,
    pub top_groups: Vec<TopGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub total: u32,
    pub graded: u32,
    pub correct: u32,
    pub exact: u32,
}

impl PredictionReport {
    /// Share of graded predictions that got at least the winner right
    pub fn accuracy(&self) -> f64 {
        if self.graded == 0 {
            0.0
        } else {
            self.correct as f64 / self.graded as f64
        }
    }
}

/// Platform-wide report for the admin back office
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformReport {
    pub users: UserReport,
    pub groups: GroupReport,
    pub predictions: PredictionReport,
    pub active_matches: u32,
}

const TOP_GROUPS: usize = 5;

impl PlatformReport {
    /// `members` maps group id to its member list
    pub fn build(
        users: &[User],
        groups: &[Group],
        members: &HashMap<String, Vec<GroupMember>>,
        matches: &[Match],
        predictions: &[Prediction],
        now: DateTime<Utc>,
    ) -> Self {
        let users_report = UserReport {
            total: users.len() as u32,
            admins: users.iter().filter(|u| u.role.is_admin()).count() as u32,
            platform_admins: users.iter().filter(|u| u.role.can_view_reports()).count() as u32,
            players: users.iter().filter(|u| !u.role.is_admin()).count() as u32,
        };

        let week_ago = now - Duration::days(7);
        let total_members: u32 = groups.iter().map(|g| g.player_count).sum();
        let mut by_size: Vec<&Group> = groups.iter().collect();
        by_size.sort_by(|a, b| b.player_count.cmp(&a.player_count));

        let top_groups = by_size
            .iter()
            .take(TOP_GROUPS)
            .map(|g| {
                let member_ids: HashSet<&str> = members
                    .get(&g.id)
                    .map(|list| list.iter().map(|m| m.user_id.as_str()).collect())
                    .unwrap_or_default();
                TopGroup {
                    name: g.name.clone(),
                    member_count: g.player_count,
                    prediction_count: predictions
                        .iter()
                        .filter(|p| member_ids.contains(p.user_id.as_str()))
                        .count() as u32,
                }
            })
            .collect();

        let groups_report = GroupReport {
            total: groups.len() as u32,
            active: groups.iter().filter(|g| g.status == GroupStatus::Active).count() as u32,
            avg_members: if groups.is_empty() {
                0.0
            } else {
                total_members as f64 / groups.len() as f64
            },
            largest_group: by_size.first().map(|g| g.player_count).unwrap_or(0),
            new_this_week: groups.iter().filter(|g| g.created_at >= week_ago).count() as u32,
            top_groups,
        };

        let matches_by_id: HashMap<&str, &Match> =
            matches.iter().map(|m| (m.id.as_str(), m)).collect();
        let mut predictions_report = PredictionReport {
            total: predictions.len() as u32,
            ..Default::default()
        };
        for p in predictions {
            let Some(m) = matches_by_id.get(p.match_id.as_str()) else {
                continue;
            };
            match grade_match(m, Some(p)) {
                Ok(Outcome::Exact) => {
                    predictions_report.graded += 1;
                    predictions_report.correct += 1;
                    predictions_report.exact += 1;
                }
                Ok(Outcome::CorrectTendency) => {
                    predictions_report.graded += 1;
                    predictions_report.correct += 1;
                }
                Ok(Outcome::Miss) => predictions_report.graded += 1,
                Err(_) => {}
            }
        }

        // Unknown statuses are not counted as active
        let active_matches = matches
            .iter()
            .filter(|m| {
                matches!(
                    m.display_status(),
                    Ok(DisplayStatus::Upcoming) | Ok(DisplayStatus::InProgress)
                )
            })
            .count() as u32;

        Self {
            users: users_report,
            groups: groups_report,
            predictions: predictions_report,
            active_matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{match_with, prediction};
    use crate::models::{Role, ScoringSystem};

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: id.to_string(),
            role,
            avatar: None,
        }
    }

    fn group(id: &str, players: u32, created_at: DateTime<Utc>, status: GroupStatus) -> Group {
        Group {
            id: id.to_string(),
            name: format!("Group {}", id),
            description: None,
            admin_id: "admin".to_string(),
            player_count: players,
            invite_code: id.to_uppercase(),
            invite_link: None,
            scoring_system: ScoringSystem::Classic,
            created_at,
            status,
            is_member: false,
            is_admin: false,
        }
    }

    fn member(user_id: &str) -> GroupMember {
        GroupMember {
            user_id: user_id.to_string(),
            name: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            joined_at: Utc::now(),
            points: 0,
            is_admin: false,
            position: None,
        }
    }

    #[test]
    fn test_build_report() {
        let now = Utc::now();
        let users = vec![
            user("admin", Role::PlatformAdmin),
            user("alice", Role::GroupAdmin),
            user("bob", Role::Player),
        ];
        let groups = vec![
            group("g1", 3, now - Duration::days(30), GroupStatus::Active),
            group("g2", 1, now - Duration::days(2), GroupStatus::Inactive),
        ];
        let mut members = HashMap::new();
        members.insert("g1".to_string(), vec![member("admin"), member("alice"), member("bob")]);
        members.insert("g2".to_string(), vec![member("alice")]);

        let matches = vec![
            match_with("m1", "finished", Some((2, 1))),
            match_with("m2", "live", Some((0, 0))),
            match_with("m3", "upcoming", None),
            match_with("m4", "postponed", None),
        ];
        let predictions = vec![
            prediction("alice", "m1", 2, 1),
            prediction("bob", "m1", 1, 0),
            prediction("admin", "m1", 0, 1),
            prediction("bob", "m3", 1, 1),
        ];

        let report = PlatformReport::build(&users, &groups, &members, &matches, &predictions, now);

        assert_eq!(report.users.total, 3);
        assert_eq!(report.users.admins, 2);
        assert_eq!(report.users.platform_admins, 1);
        assert_eq!(report.users.players, 1);

        assert_eq!(report.groups.total, 2);
        assert_eq!(report.groups.active, 1);
        assert!((report.groups.avg_members - 2.0).abs() < 1e-9);
        assert_eq!(report.groups.largest_group, 3);
        assert_eq!(report.groups.new_this_week, 1);
        assert_eq!(report.groups.top_groups[0].name, "Group g1");
        assert_eq!(report.groups.top_groups[0].prediction_count, 4);
        assert_eq!(report.groups.top_groups[1].prediction_count, 1);

        assert_eq!(report.predictions.total, 4);
        assert_eq!(report.predictions.graded, 3);
        assert_eq!(report.predictions.correct, 2);
        assert_eq!(report.predictions.exact, 1);
        assert!((report.predictions.accuracy() - 2.0 / 3.0).abs() < 1e-9);

        assert_eq!(report.active_matches, 2);
    }

    #[test]
    fn test_empty_report() {
        let report = PlatformReport::build(&[], &[], &HashMap::new(), &[], &[], Utc::now());
        assert_eq!(report.groups.avg_members, 0.0);
        assert_eq!(report.predictions.accuracy(), 0.0);
        assert!(report.groups.top_groups.is_empty());
    }
}
