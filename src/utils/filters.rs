use crate::models::{Group, Match, Role, User};
use crate::utils::status::DisplayStatus;
use serde::{Deserialize, Serialize};

/// Which groups a listing shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupFilter {
    #[default]
    Mine,
    All,
    Admin,
}

impl GroupFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupFilter::Mine => "mine",
            GroupFilter::All => "all",
            GroupFilter::Admin => "admin",
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn filter_groups<'a>(
    groups: &'a [Group],
    user_id: &str,
    filter: GroupFilter,
    search: Option<&str>,
) -> Vec<&'a Group> {
    groups
        .iter()
        .filter(|g| match filter {
            GroupFilter::Mine => g.is_member || g.admin_id == user_id,
            GroupFilter::Admin => g.is_admin || g.admin_id == user_id,
            GroupFilter::All => true,
        })
        .filter(|g| search.map_or(true, |s| contains_ignore_case(&g.name, s)))
        .collect()
}

/// Search matches name or email
pub fn filter_users<'a>(
    users: &'a [User],
    search: Option<&str>,
    role: Option<Role>,
) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| {
            search.map_or(true, |s| {
                contains_ignore_case(&u.name, s) || contains_ignore_case(&u.email, s)
            })
        })
        .filter(|u| role.map_or(true, |r| u.role == r))
        .collect()
}

/// Matches bucketed by display status
#[derive(Debug, Default)]
pub struct MatchBuckets<'a> {
    pub upcoming: Vec<&'a Match>,
    pub in_progress: Vec<&'a Match>,
    pub finished: Vec<&'a Match>,
    pub unknown: Vec<&'a Match>,
}

pub fn partition_by_status(matches: &[Match]) -> MatchBuckets<'_> {
    let mut buckets = MatchBuckets::default();
    for m in matches {
        match m.display_status() {
            Ok(DisplayStatus::Upcoming) => buckets.upcoming.push(m),
            Ok(DisplayStatus::InProgress) => buckets.in_progress.push(m),
            Ok(DisplayStatus::Finished) => buckets.finished.push(m),
            Err(_) => buckets.unknown.push(m),
        }
    }
    buckets
}
