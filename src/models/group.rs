use crate::error::ProdeError;
use crate::models::deserialize_timestamp;
use crate::utils::grader::ScoringProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named point table a group grades predictions with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringSystem {
    Classic,
    Extended,
    Simple,
}

impl ScoringSystem {
    pub fn profile(&self) -> ScoringProfile {
        match self {
            ScoringSystem::Classic => ScoringProfile::CLASSIC,
            ScoringSystem::Extended => ScoringProfile::EXTENDED,
            ScoringSystem::Simple => ScoringProfile::SIMPLE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringSystem::Classic => "classic",
            ScoringSystem::Extended => "extended",
            ScoringSystem::Simple => "simple",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScoringSystem::Classic => "3 pts exact score, 1 pt correct winner",
            ScoringSystem::Extended => "5 pts exact, 3 pts goal difference, 1 pt winner",
            ScoringSystem::Simple => "2 pts for picking the winner",
        }
    }
}

impl fmt::Display for ScoringSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScoringSystem {
    type Err = ProdeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(ScoringSystem::Classic),
            "extended" => Ok(ScoringSystem::Extended),
            "simple" => Ok(ScoringSystem::Simple),
            other => Err(ProdeError::InvalidInput(format!("unknown scoring system {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Active,
    Inactive,
}

/// A prediction group as returned by `/groups`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: String,
    #[serde(default)]
    pub player_count: u32,
    pub invite_code: String,
    pub invite_link: Option<String>,
    pub scoring_system: ScoringSystem,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: GroupStatus,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// What the acting user may do inside one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAccess {
    Admin,
    Member,
    Visitor,
}

impl GroupAccess {
    pub fn can_edit_settings(&self) -> bool {
        match self {
            GroupAccess::Admin => true,
            GroupAccess::Member | GroupAccess::Visitor => false,
        }
    }

    pub fn can_view_ranking(&self) -> bool {
        match self {
            GroupAccess::Admin | GroupAccess::Member => true,
            GroupAccess::Visitor => false,
        }
    }
}

impl Group {
    /// Admin-ness comes from the group record, not from the platform role
    pub fn access_for(&self, user_id: &str) -> GroupAccess {
        if self.admin_id == user_id || self.is_admin {
            GroupAccess::Admin
        } else if self.is_member {
            GroupAccess::Member
        } else {
            GroupAccess::Visitor
        }
    }

    pub fn profile(&self) -> ScoringProfile {
        self.scoring_system.profile()
    }

    /// The point table is frozen once the tournament has started
    pub fn change_scoring_system(
        &mut self,
        system: ScoringSystem,
        tournament_started: bool,
    ) -> Result<(), ProdeError> {
        if tournament_started && system != self.scoring_system {
            return Err(ProdeError::ScoringLocked(self.id.clone()));
        }
        self.scoring_system = system;
        Ok(())
    }
}

/// Member row of `/groups/{id}/ranking`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub is_admin: bool,
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
    pub scoring_system: ScoringSystem,
}

impl CreateGroupRequest {
    pub fn new(
        name: &str,
        description: Option<&str>,
        scoring_system: ScoringSystem,
    ) -> Result<Self, ProdeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProdeError::InvalidInput("group name must not be empty".to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            scoring_system,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGroupRequest {
    pub invite_code: String,
}

impl JoinGroupRequest {
    /// Codes are compared verbatim; only surrounding whitespace is dropped
    pub fn new(invite_code: &str) -> Result<Self, ProdeError> {
        let invite_code = invite_code.trim();
        if invite_code.is_empty() {
            return Err(ProdeError::InvalidInput("invite code must not be empty".to_string()));
        }
        Ok(Self {
            invite_code: invite_code.to_string(),
        })
    }
}
