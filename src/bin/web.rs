use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use prode::config::AppConfig;
use prode::countdown::{next_kickoff, time_left};
use prode::filters::{filter_groups, filter_users, partition_by_status, GroupFilter};
use prode::match_view::MatchView;
use prode::predictor_api::PredictorApiClient;
use prode::ranking::RankingEntry;
use prode::reports::{AdminStats, PlatformReport};
use prode::session::{login, logout};
use prode::status::DisplayStatus;
use prode::{load_prode_data, ProdeData, Role, User, View};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

// Custom filters for formatting
mod filters {
    use chrono::{DateTime, Utc};

    pub fn percent(value: f64) -> ::askama::Result<String> {
        Ok(format!("{:.1}%", value * 100.0))
    }

    pub fn one_decimal(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.1}", value))
    }

    pub fn datetime(value: &DateTime<Utc>) -> ::askama::Result<String> {
        Ok(value.format("%Y-%m-%d %H:%M UTC").to_string())
    }
}

/// Group card shown on the dashboard and the group list
struct GroupRow {
    id: String,
    name: String,
    description: String,
    scoring: String,
    player_count: u32,
    is_admin: bool,
}

impl GroupRow {
    fn new(group: &prode::Group, user_id: &str) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            description: group.description.clone().unwrap_or_default(),
            scoring: group.scoring_system.description().to_string(),
            player_count: group.player_count,
            is_admin: group.access_for(user_id).can_edit_settings(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    active_page: String,
    user_name: String,
    is_admin: bool,
    next_match: Option<String>,
    countdown: Option<String>,
    open_count: usize,
    live_count: usize,
    groups: Vec<GroupRow>,
    fetched_at: chrono::DateTime<Utc>,
}

#[derive(Template)]
#[template(path = "matches.html")]
struct MatchesTemplate {
    active_page: String,
    is_admin: bool,
    sections: Vec<MatchSection>,
}

struct MatchSection {
    title: &'static str,
    rows: Vec<MatchView>,
}

#[derive(Template)]
#[template(path = "groups.html")]
struct GroupsTemplate {
    active_page: String,
    is_admin: bool,
    filter: String,
    search: String,
    groups: Vec<GroupRow>,
}

#[derive(Template)]
#[template(path = "group.html")]
struct GroupTemplate {
    active_page: String,
    is_admin: bool,
    group: GroupRow,
    invite_code: Option<String>,
    can_view_ranking: bool,
    ranking: Vec<RankingEntry>,
    finished: Vec<MatchView>,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    active_page: String,
    is_admin: bool,
    stats: AdminStats,
    report: PlatformReport,
    search: String,
    users: Vec<User>,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Shared state holding the snapshot loaded at startup
type SharedData = Arc<RwLock<Option<ProdeData>>>;

async fn snapshot(data: &SharedData) -> Result<ProdeData, Response> {
    data.read()
        .await
        .clone()
        .ok_or_else(|| (StatusCode::INTERNAL_SERVER_ERROR, "Data not loaded yet").into_response())
}

async fn home(State(data): State<SharedData>) -> Response {
    let data = match snapshot(&data).await {
        Ok(d) => d,
        Err(response) => return response,
    };

    match data.user.role.landing_view() {
        View::AdminDashboard => render_admin(data, AdminQuery::default()),
        View::PlayerDashboard => render_player_home(data),
    }
}

fn render_player_home(data: ProdeData) -> Response {
    let now = Utc::now();
    let next = next_kickoff(&data.matches, now);
    let buckets = partition_by_status(&data.matches);
    let gates = data.gate_book();

    let template = HomeTemplate {
        active_page: "home".to_string(),
        user_name: data.user.name.clone(),
        is_admin: data.user.role.can_view_reports(),
        next_match: next.map(|m| m.title()),
        countdown: next.map(|m| time_left(m.kickoff(), now).to_string()),
        open_count: buckets
            .upcoming
            .iter()
            .filter(|m| gates.gate(&m.id).is_open())
            .count(),
        live_count: buckets.in_progress.len(),
        groups: filter_groups(&data.groups, &data.user.id, GroupFilter::Mine, None)
            .into_iter()
            .map(|g| GroupRow::new(g, &data.user.id))
            .collect(),
        fetched_at: data.fetched_at,
    };

    HtmlTemplate(template).into_response()
}

async fn matches(State(data): State<SharedData>) -> Response {
    let data = match snapshot(&data).await {
        Ok(d) => d,
        Err(response) => return response,
    };

    let mut sections = [
        ("Upcoming", Vec::new()),
        ("In progress", Vec::new()),
        ("Finished", Vec::new()),
        ("Unavailable", Vec::new()),
    ];
    for view in data.match_views(None) {
        let slot = match view.status {
            Some(DisplayStatus::Upcoming) => 0,
            Some(DisplayStatus::InProgress) => 1,
            Some(DisplayStatus::Finished) => 2,
            None => 3,
        };
        sections[slot].1.push(view);
    }

    let template = MatchesTemplate {
        active_page: "matches".to_string(),
        is_admin: data.user.role.can_view_reports(),
        sections: sections
            .into_iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(title, rows)| MatchSection { title, rows })
            .collect(),
    };

    HtmlTemplate(template).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct GroupsQuery {
    filter: Option<GroupFilter>,
    search: Option<String>,
}

async fn groups(State(data): State<SharedData>, Query(query): Query<GroupsQuery>) -> Response {
    let data = match snapshot(&data).await {
        Ok(d) => d,
        Err(response) => return response,
    };

    let filter = query.filter.unwrap_or_default();
    let search = query.search.unwrap_or_default();
    let search_term = Some(search.trim()).filter(|s| !s.is_empty());

    let template = GroupsTemplate {
        active_page: "groups".to_string(),
        is_admin: data.user.role.can_view_reports(),
        filter: filter.as_str().to_string(),
        groups: filter_groups(&data.groups, &data.user.id, filter, search_term)
            .into_iter()
            .map(|g| GroupRow::new(g, &data.user.id))
            .collect(),
        search,
    };

    HtmlTemplate(template).into_response()
}

async fn group_detail(State(data): State<SharedData>, Path(id): Path<String>) -> Response {
    let data = match snapshot(&data).await {
        Ok(d) => d,
        Err(response) => return response,
    };

    let Some(group) = data.group(&id) else {
        return (StatusCode::NOT_FOUND, "Group not found").into_response();
    };
    let access = group.access_for(&data.user.id);
    let profile = group.profile();

    let template = GroupTemplate {
        active_page: "groups".to_string(),
        is_admin: data.user.role.can_view_reports(),
        group: GroupRow::new(group, &data.user.id),
        invite_code: access
            .can_edit_settings()
            .then(|| group.invite_code.clone()),
        can_view_ranking: access.can_view_ranking(),
        ranking: if access.can_view_ranking() {
            data.standings(&id).unwrap_or_default()
        } else {
            Vec::new()
        },
        finished: data
            .match_views(Some(&profile))
            .into_iter()
            .filter(|v| v.score.is_some())
            .collect(),
    };

    HtmlTemplate(template).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct AdminQuery {
    search: Option<String>,
    role: Option<Role>,
}

async fn admin(State(data): State<SharedData>, Query(query): Query<AdminQuery>) -> Response {
    let data = match snapshot(&data).await {
        Ok(d) => d,
        Err(response) => return response,
    };

    if !data.user.role.can_view_reports() {
        return (StatusCode::FORBIDDEN, "Admins only").into_response();
    }
    render_admin(data, query)
}

fn render_admin(data: ProdeData, query: AdminQuery) -> Response {
    let search = query.search.unwrap_or_default();
    let search_term = Some(search.trim()).filter(|s| !s.is_empty());

    let template = AdminTemplate {
        active_page: "admin".to_string(),
        is_admin: true,
        stats: data.admin_stats.clone(),
        report: data.report(),
        users: filter_users(&data.users, search_term, query.role)
            .into_iter()
            .cloned()
            .collect(),
        search,
    };

    HtmlTemplate(template).into_response()
}

fn app(data: SharedData) -> Router {
    Router::new()
        // This will serve files from the "static" directory at the "/static" URL path
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(home))
        .route("/matches", get(matches))
        .route("/groups", get(groups))
        .route("/groups/:id", get(group_detail))
        .route("/admin", get(admin))
        .with_state(data)
}

async fn load_snapshot(config: &AppConfig) -> anyhow::Result<ProdeData> {
    let client = PredictorApiClient::new(config.api_base_url.clone());
    let session = login(&client, &config.credentials()?).await?;
    let data = load_prode_data(config, &client, &session).await?;
    logout(session);
    Ok(data)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    println!("Fetching prediction pool data...");

    // Fetch data on startup
    let data = match load_snapshot(&config).await {
        Ok(data) => {
            println!("Data loaded successfully for {}", data.user.name);
            println!("  - {} Matches", data.matches.len());
            println!("  - {} Groups", data.groups.len());
            println!("  - {} Predictions", data.predictions.len());
            if data.user.role.can_manage_users() {
                println!("  - {} Users", data.users.len());
            }
            Arc::new(RwLock::new(Some(data)))
        }
        Err(e) => {
            eprintln!("Error fetching data: {:#}", e);
            eprintln!("Server will start but pages may show errors");
            Arc::new(RwLock::new(None))
        }
    };

    println!("\nStarting web server at http://{}", config.bind_addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app(data)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use prode::{Group, GroupMember, GroupStatus, Match, Prediction, ScoringSystem};
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: format!("User {}", id),
            role,
            avatar: None,
        }
    }

    fn member(user_id: &str) -> GroupMember {
        GroupMember {
            user_id: user_id.to_string(),
            name: format!("User {}", user_id),
            email: format!("{}@example.com", user_id),
            joined_at: Utc::now(),
            points: 0,
            is_admin: false,
            position: None,
        }
    }

    fn snapshot_for(role: Role) -> ProdeData {
        let matches: Vec<Match> = serde_json::from_value(serde_json::json!([
            {
                "id": "m1", "homeTeam": "Mexico", "awayTeam": "South Africa",
                "date": "2026-06-11", "time": "19:00", "status": "finished",
                "homeScore": 2, "awayScore": 1
            },
            {
                "id": "m2", "homeTeam": "Canada", "awayTeam": "TBD",
                "date": "2099-06-12", "time": "19:00", "status": "upcoming",
                "homeScore": 0, "awayScore": 0
            }
        ]))
        .unwrap();

        let group = Group {
            id: "g1".to_string(),
            name: "Office League".to_string(),
            description: None,
            admin_id: "admin".to_string(),
            player_count: 2,
            invite_code: "OFFICE01".to_string(),
            invite_link: None,
            scoring_system: ScoringSystem::Classic,
            created_at: Utc::now(),
            status: GroupStatus::Active,
            is_member: true,
            is_admin: false,
        };

        let predictions = vec![Prediction {
            id: None,
            match_id: "m1".to_string(),
            user_id: "p1".to_string(),
            home_score: 2,
            away_score: 1,
            points: None,
        }];

        ProdeData {
            user: user("p1", role),
            matches,
            groups: vec![group],
            members: HashMap::from([("g1".to_string(), vec![member("p1"), member("p2")])]),
            predictions,
            users: vec![user("p1", Role::Player), user("admin", Role::PlatformAdmin)],
            admin_stats: AdminStats {
                total_users: 2,
                total_groups: 1,
                active_matches: 1,
                predictions_today: 4,
            },
            fetched_at: Utc::now(),
        }
    }

    async fn get(data: Option<ProdeData>, uri: &str) -> (StatusCode, String) {
        let state = Arc::new(RwLock::new(data));
        let response = app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_home_dispatches_on_role() {
        let (status, body) = get(Some(snapshot_for(Role::Player)), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("User p1"));
        assert!(body.contains("Office League"));

        let (status, body) = get(Some(snapshot_for(Role::PlatformAdmin)), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Platform overview"));
    }

    #[tokio::test]
    async fn test_admin_requires_report_capability() {
        let (status, _) = get(Some(snapshot_for(Role::GroupAdmin)), "/admin").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) =
            get(Some(snapshot_for(Role::PlatformAdmin)), "/admin?search=admin").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("admin@example.com"));
        assert!(!body.contains("p1@example.com"));
        // The only graded prediction is an exact hit
        assert!(body.contains("accuracy 100.0%"));
    }

    #[tokio::test]
    async fn test_group_page_shows_local_ranking() {
        let (status, body) = get(Some(snapshot_for(Role::Player)), "/groups/g1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("User p2"));
        // Members do not see the invite code
        assert!(!body.contains("OFFICE01"));

        let (status, _) = get(Some(snapshot_for(Role::Player)), "/groups/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_matches_page_hides_unfinished_scores() {
        let (status, body) = get(Some(snapshot_for(Role::Player)), "/matches").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("2-1"));
        assert!(!body.contains("0-0"));
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_an_error() {
        let (status, _) = get(None, "/matches").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
