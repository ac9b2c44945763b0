use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-wide role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    GroupAdmin,
    PlatformAdmin,
}

/// Screen a user lands on after logging in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    PlayerDashboard,
    AdminDashboard,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::GroupAdmin => "group_admin",
            Role::PlatformAdmin => "platform_admin",
        }
    }

    pub fn landing_view(&self) -> View {
        match self {
            Role::PlatformAdmin => View::AdminDashboard,
            Role::GroupAdmin | Role::Player => View::PlayerDashboard,
        }
    }

    /// Create, reschedule and score matches
    pub fn can_manage_matches(&self) -> bool {
        match self {
            Role::PlatformAdmin => true,
            Role::GroupAdmin | Role::Player => false,
        }
    }

    pub fn can_manage_users(&self) -> bool {
        match self {
            Role::PlatformAdmin => true,
            Role::GroupAdmin | Role::Player => false,
        }
    }

    pub fn can_view_reports(&self) -> bool {
        match self {
            Role::PlatformAdmin => true,
            Role::GroupAdmin | Role::Player => false,
        }
    }

    pub fn can_create_groups(&self) -> bool {
        match self {
            Role::PlatformAdmin | Role::GroupAdmin | Role::Player => true,
        }
    }

    pub fn is_admin(&self) -> bool {
        match self {
            Role::GroupAdmin | Role::PlatformAdmin => true,
            Role::Player => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
