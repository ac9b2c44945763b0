pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod utils;

pub use api::*;
pub use models::*;
pub use utils::*;

use anyhow::{Context, Result};
use api::predictor_api::PredictorApiClient;
use chrono::{DateTime, Utc};
use config::AppConfig;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use session::Session;
use std::collections::HashMap;
use tracing::{info, warn};
use utils::data::{load_from_cache, save_to_cache};
use utils::edit_gate::GateBook;
use utils::filters::GroupFilter;
use utils::grader::ScoringProfile;
use utils::match_view::MatchView;
use utils::ranking::{compute_ranking, stored_ranking, RankingEntry};
use utils::reports::{AdminStats, PlatformReport};

const SNAPSHOT_CACHE_FILE: &str = "prode_cache.json";

/// Everything the dashboard screens show, loaded in one go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProdeData {
    pub user: User,
    pub matches: Vec<Match>,
    pub groups: Vec<Group>,
    /// Group id to member list
    pub members: HashMap<String, Vec<GroupMember>>,
    pub predictions: Vec<Prediction>,
    pub users: Vec<User>,
    pub admin_stats: AdminStats,
    pub fetched_at: DateTime<Utc>,
}

impl ProdeData {
    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Standings graded locally under the group's own scoring profile
    pub fn ranking(&self, group_id: &str) -> Option<Vec<RankingEntry>> {
        let group = self.group(group_id)?;
        let members = self.members.get(group_id).map(Vec::as_slice).unwrap_or_default();
        Some(compute_ranking(
            members,
            &self.matches,
            &self.predictions,
            &group.profile(),
        ))
    }

    /// The table to show and export: the local grading, or the server's points
    /// while no prediction in the group can be graded yet
    pub fn standings(&self, group_id: &str) -> Option<Vec<RankingEntry>> {
        let ranking = self.ranking(group_id)?;
        if ranking.iter().any(|e| e.graded > 0) {
            return Some(ranking);
        }
        let members = self.members.get(group_id).cloned().unwrap_or_default();
        Some(stored_ranking(members))
    }

    pub fn gate_book(&self) -> GateBook {
        let mut book = GateBook::new();
        book.observe_all(&self.matches);
        book
    }

    pub fn match_views(&self, profile: Option<&ScoringProfile>) -> Vec<MatchView> {
        let gates = self.gate_book();
        self.matches
            .iter()
            .map(|m| MatchView::new(m, gates.gate(&m.id), profile))
            .collect()
    }

    pub fn report(&self) -> PlatformReport {
        PlatformReport::build(
            &self.users,
            &self.groups,
            &self.members,
            &self.matches,
            &self.predictions,
            self.fetched_at,
        )
    }
}

/// Read side of the backend, one method per dashboard panel
#[allow(async_fn_in_trait)]
pub trait ProdeSource {
    async fn matches(&self, session: &Session) -> Result<Vec<Match>>;
    async fn groups(&self, session: &Session, filter: GroupFilter) -> Result<Vec<Group>>;
    async fn members(&self, session: &Session, group_id: &str) -> Result<Vec<GroupMember>>;
    async fn predictions(&self, session: &Session) -> Result<Vec<Prediction>>;
    async fn users(&self, session: &Session) -> Result<Vec<User>>;
    async fn admin_stats(&self, session: &Session) -> Result<AdminStats>;
}

impl ProdeSource for PredictorApiClient {
    async fn matches(&self, session: &Session) -> Result<Vec<Match>> {
        self.fetch_matches(session, None).await
    }

    async fn groups(&self, session: &Session, filter: GroupFilter) -> Result<Vec<Group>> {
        self.fetch_groups(session, filter, None).await
    }

    async fn members(&self, session: &Session, group_id: &str) -> Result<Vec<GroupMember>> {
        self.fetch_ranking(session, group_id).await
    }

    async fn predictions(&self, session: &Session) -> Result<Vec<Prediction>> {
        self.fetch_predictions(session, None, None).await
    }

    async fn users(&self, session: &Session) -> Result<Vec<User>> {
        self.fetch_users(session, None, None).await
    }

    async fn admin_stats(&self, session: &Session) -> Result<AdminStats> {
        self.fetch_admin_stats(session).await
    }
}

/// A failed panel shows up empty instead of taking the whole screen down
fn or_empty<T: Default>(result: Result<T>, panel: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!("Failed to load {}: {:#}", panel, e);
        T::default()
    })
}

/// Load every panel concurrently. Admin-only panels are skipped for other roles.
pub async fn fetch_all_prode_data<S: ProdeSource>(source: &S, session: &Session) -> ProdeData {
    let role = session.role();
    let group_filter = match role {
        Role::PlatformAdmin => GroupFilter::All,
        Role::GroupAdmin | Role::Player => GroupFilter::Mine,
    };

    let users = async {
        if role.can_manage_users() {
            source.users(session).await
        } else {
            Ok(Vec::new())
        }
    };
    let admin_stats = async {
        if role.can_view_reports() {
            source.admin_stats(session).await
        } else {
            Ok(AdminStats::default())
        }
    };

    let (matches, groups, predictions, users, admin_stats) = tokio::join!(
        source.matches(session),
        source.groups(session, group_filter),
        source.predictions(session),
        users,
        admin_stats,
    );

    let groups = or_empty(groups, "groups");
    let member_lists = join_all(groups.iter().map(|g| source.members(session, &g.id))).await;
    let members = groups
        .iter()
        .zip(member_lists)
        .map(|(g, list)| (g.id.clone(), or_empty(list, &format!("members of {}", g.name))))
        .collect();

    ProdeData {
        user: session.user().clone(),
        matches: or_empty(matches, "matches"),
        groups,
        members,
        predictions: or_empty(predictions, "predictions"),
        users: or_empty(users, "users"),
        admin_stats: or_empty(admin_stats, "admin stats"),
        fetched_at: Utc::now(),
    }
}

/// Fetch a fresh snapshot, or reuse the cached one when `USE_CACHE=1`
pub async fn load_prode_data<S: ProdeSource>(
    config: &AppConfig,
    source: &S,
    session: &Session,
) -> Result<ProdeData> {
    let cache_file = config.cache_file(SNAPSHOT_CACHE_FILE);

    if config.use_cache && cache_file.exists() {
        info!("Loading snapshot from {}", cache_file.display());
        return load_from_cache(&cache_file).context("Failed to load cached snapshot");
    }

    let data = fetch_all_prode_data(source, session).await;
    save_to_cache(&data, &cache_file)?;
    info!(
        "Loaded {} matches, {} groups, {} predictions",
        data.matches.len(),
        data.groups.len(),
        data.predictions.len()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{match_with, prediction};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        fail_matches: bool,
        admin_calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(fail_matches: bool) -> Self {
            Self {
                fail_matches,
                admin_calls: AtomicUsize::new(0),
            }
        }
    }

    fn group(id: &str, system: ScoringSystem) -> Group {
        Group {
            id: id.to_string(),
            name: format!("Group {}", id),
            description: None,
            admin_id: "alice".to_string(),
            player_count: 2,
            invite_code: id.to_uppercase(),
            invite_link: None,
            scoring_system: system,
            created_at: Utc::now(),
            status: GroupStatus::Active,
            is_member: true,
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

    impl ProdeSource for FakeSource {
        async fn matches(&self, _session: &Session) -> Result<Vec<Match>> {
            if self.fail_matches {
                anyhow::bail!("backend down");
            }
            Ok(vec![
                match_with("m1", "finished", Some((3, 2))),
                match_with("m2", "upcoming", None),
            ])
        }

        async fn groups(&self, _session: &Session, filter: GroupFilter) -> Result<Vec<Group>> {
            let mut groups = vec![group("classic", ScoringSystem::Classic)];
            if filter == GroupFilter::All {
                groups.push(group("extended", ScoringSystem::Extended));
            }
            Ok(groups)
        }

        async fn members(&self, _session: &Session, group_id: &str) -> Result<Vec<GroupMember>> {
            if group_id == "extended" {
                anyhow::bail!("ranking unavailable");
            }
            Ok(vec![member("alice"), member("bob")])
        }

        async fn predictions(&self, _session: &Session) -> Result<Vec<Prediction>> {
            Ok(vec![prediction("alice", "m1", 2, 1), prediction("bob", "m1", 3, 2)])
        }

        async fn users(&self, _session: &Session) -> Result<Vec<User>> {
            self.admin_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn admin_stats(&self, _session: &Session) -> Result<AdminStats> {
            self.admin_calls.fetch_add(1, Ordering::SeqCst);
            Ok(AdminStats {
                total_users: 3,
                ..Default::default()
            })
        }
    }

    fn session(role: Role) -> Session {
        Session::new(
            User {
                id: "alice".to_string(),
                email: "alice@example.com".to_string(),
                name: "Alice".to_string(),
                role,
                avatar: None,
            },
            "token",
        )
    }

    #[tokio::test]
    async fn test_player_snapshot_skips_admin_panels() {
        let source = FakeSource::new(false);
        let data = fetch_all_prode_data(&source, &session(Role::Player)).await;

        assert_eq!(source.admin_calls.load(Ordering::SeqCst), 0);
        assert_eq!(data.matches.len(), 2);
        assert_eq!(data.groups.len(), 1);
        assert_eq!(data.admin_stats, AdminStats::default());

        let ranking = data.ranking("classic").unwrap();
        assert_eq!(ranking[0].user_id, "bob");
        assert_eq!(ranking[0].points, 3);
        assert_eq!(ranking[1].points, 1);
        assert!(data.ranking("missing").is_none());

        let views = data.match_views(None);
        assert!(!views[0].can_predict);
        assert!(views[1].can_predict);
    }

    #[tokio::test]
    async fn test_failing_panels_degrade_to_empty() {
        let source = FakeSource::new(true);
        let data = fetch_all_prode_data(&source, &session(Role::PlatformAdmin)).await;

        assert_eq!(source.admin_calls.load(Ordering::SeqCst), 2);
        assert!(data.matches.is_empty());
        assert_eq!(data.groups.len(), 2);
        assert_eq!(data.members["classic"].len(), 2);
        assert!(data.members["extended"].is_empty());
        assert_eq!(data.predictions.len(), 2);
        assert_eq!(data.admin_stats.total_users, 3);

        // Without matches nothing can be graded
        let ranking = data.ranking("classic").unwrap();
        assert!(ranking.iter().all(|e| e.points == 0));
        assert!(data.ranking("extended").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_standings_fall_back_to_stored_points() {
        let source = FakeSource::new(false);
        let mut data = fetch_all_prode_data(&source, &session(Role::Player)).await;

        // Graded locally: same table as the ranking
        let graded = data.standings("classic").unwrap();
        assert_eq!(graded[0].user_id, "bob");
        assert_eq!(graded[0].graded, 1);

        // Nothing finished yet: the server's points decide the order
        data.matches = vec![match_with("m1", "upcoming", None)];
        if let Some(members) = data.members.get_mut("classic") {
            members[0].points = 2;
            members[1].points = 7;
        }
        let stored = data.standings("classic").unwrap();
        let rows: Vec<(u32, &str, u32)> = stored
            .iter()
            .map(|e| (e.position, e.user_id.as_str(), e.points))
            .collect();
        assert_eq!(rows, vec![(1, "bob", 7), (2, "alice", 2)]);
        assert!(data.standings("missing").is_none());
    }
}
