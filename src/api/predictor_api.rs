use crate::error::{AuthError, ProdeError};
use crate::models::{
    AuthResponse, CreateGroupRequest, Group, GroupMember, JoinGroupRequest, Match, Prediction,
    PredictionDraft, Role, Score, ScoringSystem, User,
};
use crate::session::{Authenticator, Credentials, Session};
use crate::utils::edit_gate::EditGate;
use crate::utils::filters::GroupFilter;
use crate::utils::reports::AdminStats;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

/// Body of `POST /matches`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub home_team: String,
    pub away_team: String,
    pub home_flag: Option<String>,
    pub away_flag: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub status: String,
}

/// Body of `PUT /matches/{id}`; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
}

/// Client for the prediction-pool backend
pub struct PredictorApiClient {
    client: Client,
    base_url: String,
}

impl PredictorApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?;

        if !response.status().is_success() {
            anyhow::bail!("Predictor API returned {} while trying to {}", response.status(), what);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response to {}", what))
    }

    fn get(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", session.bearer())
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&RegisterBody { email, password, name })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::UnexpectedStatus(response.status()));
        }

        let auth: AuthResponse = response.json().await?;
        Ok(Session::from(auth))
    }

    pub async fn me(&self, session: &Session) -> Result<User> {
        self.send_json(self.get(session, "/auth/me"), "fetch current user")
            .await
    }

    /// Matches with the caller's prediction attached, optionally by wire status
    pub async fn fetch_matches(
        &self,
        session: &Session,
        status: Option<&str>,
    ) -> Result<Vec<Match>> {
        let mut request = self.get(session, "/matches");
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        self.send_json(request, "fetch matches").await
    }

    pub async fn create_match(
        &self,
        session: &Session,
        body: &CreateMatchRequest,
    ) -> Result<Match> {
        ensure_role(session.role(), Role::can_manage_matches, "create matches")?;
        let request = self
            .client
            .post(self.url("/matches"))
            .header("Authorization", session.bearer())
            .json(body);
        self.send_json(request, "create match").await
    }

    pub async fn update_match(
        &self,
        session: &Session,
        match_id: &str,
        body: &UpdateMatchRequest,
    ) -> Result<Match> {
        ensure_role(session.role(), Role::can_manage_matches, "update matches")?;
        let request = self
            .client
            .put(self.url(&format!("/matches/{}", match_id)))
            .header("Authorization", session.bearer())
            .json(body);
        self.send_json(request, "update match").await
    }

    pub async fn fetch_predictions(
        &self,
        session: &Session,
        user_id: Option<&str>,
        match_id: Option<&str>,
    ) -> Result<Vec<Prediction>> {
        let mut query = Vec::new();
        if let Some(user_id) = user_id {
            query.push(("userId", user_id));
        }
        if let Some(match_id) = match_id {
            query.push(("matchId", match_id));
        }
        let request = self.get(session, "/predictions").query(&query);
        self.send_json(request, "fetch predictions").await
    }

    /// Create or replace the caller's prediction.
    /// Refused locally once the match has left `upcoming`.
    pub async fn submit_prediction(
        &self,
        session: &Session,
        m: &Match,
        gate: EditGate,
        score: Score,
    ) -> Result<Prediction> {
        let gate = gate.observe(&m.status);
        gate.ensure_open(&m.id)?;
        let draft = PredictionDraft::from_score(m.id.clone(), score)?;
        debug!("Submitting {}-{} for {}", draft.home_score, draft.away_score, m.title());

        let request = self
            .client
            .post(self.url("/predictions"))
            .header("Authorization", session.bearer())
            .json(&draft);
        self.send_json(request, "submit prediction").await
    }

    pub async fn fetch_groups(
        &self,
        session: &Session,
        filter: GroupFilter,
        search: Option<&str>,
    ) -> Result<Vec<Group>> {
        let mut query = vec![("filter", filter.as_str())];
        if let Some(search) = search {
            query.push(("search", search));
        }
        let request = self.get(session, "/groups").query(&query);
        self.send_json(request, "fetch groups").await
    }

    pub async fn fetch_group(&self, session: &Session, group_id: &str) -> Result<Group> {
        self.send_json(self.get(session, &format!("/groups/{}", group_id)), "fetch group")
            .await
    }

    pub async fn create_group(
        &self,
        session: &Session,
        name: &str,
        description: Option<&str>,
        scoring_system: ScoringSystem,
    ) -> Result<Group> {
        ensure_role(session.role(), Role::can_create_groups, "create groups")?;
        let body = CreateGroupRequest::new(name, description, scoring_system)?;
        let request = self
            .client
            .post(self.url("/groups"))
            .header("Authorization", session.bearer())
            .json(&body);
        self.send_json(request, "create group").await
    }

    pub async fn join_group(&self, session: &Session, invite_code: &str) -> Result<Group> {
        let body = JoinGroupRequest::new(invite_code)?;
        let request = self
            .client
            .post(self.url("/groups/join"))
            .header("Authorization", session.bearer())
            .json(&body);
        self.send_json(request, "join group").await
    }

    /// Members of a group, ordered by the points the server holds
    pub async fn fetch_ranking(
        &self,
        session: &Session,
        group_id: &str,
    ) -> Result<Vec<GroupMember>> {
        let path = format!("/groups/{}/ranking", group_id);
        self.send_json(self.get(session, &path), "fetch group ranking")
            .await
    }

    pub async fn fetch_users(
        &self,
        session: &Session,
        search: Option<&str>,
        role: Option<Role>,
    ) -> Result<Vec<User>> {
        ensure_role(session.role(), Role::can_manage_users, "list users")?;
        let mut query = Vec::new();
        if let Some(search) = search {
            query.push(("search", search));
        }
        if let Some(role) = role {
            query.push(("role", role.as_str()));
        }
        let request = self.get(session, "/users").query(&query);
        self.send_json(request, "fetch users").await
    }

    pub async fn fetch_admin_stats(&self, session: &Session) -> Result<AdminStats> {
        ensure_role(session.role(), Role::can_view_reports, "view admin stats")?;
        self.send_json(self.get(session, "/admin/stats"), "fetch admin stats")
            .await
    }
}

impl Authenticator for PredictorApiClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginBody {
                email: &credentials.email,
                password: credentials.password.expose_secret(),
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            status => Err(AuthError::UnexpectedStatus(status)),
        }
    }
}

fn ensure_role(
    role: Role,
    allowed: fn(&Role) -> bool,
    action: &'static str,
) -> Result<(), ProdeError> {
    if allowed(&role) {
        Ok(())
    } else {
        Err(ProdeError::Forbidden(role.to_string(), action))
    }
}
