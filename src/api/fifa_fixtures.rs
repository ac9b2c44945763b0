use crate::models::{parse_timestamp, Match};
use crate::utils::flags::team_flag;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

const FIFA_API_URL: &str = "https://api.fifa.com/api/v3/calendar/matches";
const FIFA_SEASON_ID: &str = "285023"; // World Cup 2026

/// Response of the FIFA calendar endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FifaCalendarResponse {
    #[serde(default)]
    results: Vec<FifaMatch>,
}

/// Text localised per language; the first entry is the requested one
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LocalizedText {
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FifaTeam {
    #[serde(default)]
    team_name: Vec<LocalizedText>,
    abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FifaStadium {
    #[serde(default)]
    name: Vec<LocalizedText>,
    #[serde(default)]
    city_name: Vec<LocalizedText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FifaMatch {
    id_match: Option<String>,
    match_number: Option<u32>,
    #[serde(default)]
    stage_name: Vec<LocalizedText>,
    #[serde(default)]
    group_name: Vec<LocalizedText>,
    date: Option<String>,
    home: Option<FifaTeam>,
    away: Option<FifaTeam>,
    stadium: Option<FifaStadium>,
    home_team_score: Option<i32>,
    away_team_score: Option<i32>,
    match_status: Option<i32>,
}

fn first(texts: &[LocalizedText]) -> Option<String> {
    texts.first().map(|t| t.description.clone())
}

impl FifaTeam {
    fn name(&self) -> Option<String> {
        first(&self.team_name).or_else(|| self.abbreviation.clone())
    }
}

/// One normalised fixture, cached as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub match_id: Option<String>,
    pub match_number: Option<u32>,
    pub stage: Option<String>,
    pub group: Option<String>,
    pub date: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub stadium: Option<String>,
    pub city: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub match_status: Option<i32>,
}

impl From<FifaMatch> for Fixture {
    fn from(m: FifaMatch) -> Self {
        Fixture {
            match_id: m.id_match,
            match_number: m.match_number,
            stage: first(&m.stage_name),
            group: first(&m.group_name),
            date: m.date,
            home_team: m.home.as_ref().and_then(FifaTeam::name),
            away_team: m.away.as_ref().and_then(FifaTeam::name),
            stadium: m.stadium.as_ref().and_then(|s| first(&s.name)),
            city: m.stadium.as_ref().and_then(|s| first(&s.city_name)),
            home_score: m.home_team_score,
            away_score: m.away_team_score,
            match_status: m.match_status,
        }
    }
}

impl Fixture {
    /// Wire status for the FIFA status code: 1 upcoming, 2 live, anything else finished
    pub fn wire_status(&self) -> &'static str {
        match self.match_status.unwrap_or(1) {
            1 => "upcoming",
            2 => "live",
            _ => "finished",
        }
    }

    /// Convert to a backend match record. Fixtures without a parsable kickoff are skipped.
    pub fn to_match(&self) -> Option<Match> {
        let kickoff = parse_timestamp(self.date.as_deref()?)?;
        let home_team = self.home_team.clone().unwrap_or_else(|| "TBD".to_string());
        let away_team = self.away_team.clone().unwrap_or_else(|| "TBD".to_string());

        Some(Match {
            id: self
                .match_id
                .clone()
                .unwrap_or_else(|| format!("match-{}", self.match_number.unwrap_or_default())),
            home_flag: Some(team_flag(Some(&home_team)).to_string()),
            away_flag: Some(team_flag(Some(&away_team)).to_string()),
            home_team,
            away_team,
            date: kickoff.date_naive(),
            time: Some(kickoff.format("%H:%M").to_string()),
            status: self.wire_status().to_string(),
            home_score: self.home_score,
            away_score: self.away_score,
            match_number: self.match_number,
            stage: self.stage.clone(),
            group: self.group.clone(),
            stadium: self.stadium.clone(),
            city: self.city.clone(),
            user_prediction: None,
        })
    }
}

/// Normalise a calendar payload, ordered by kickoff with undated fixtures last
pub fn parse_fixtures(json: &str) -> Result<Vec<Fixture>> {
    let response: FifaCalendarResponse =
        serde_json::from_str(json).context("Failed to parse FIFA calendar response")?;
    if response.results.is_empty() {
        anyhow::bail!("No matches found in the FIFA calendar response");
    }

    let mut fixtures: Vec<Fixture> = response.results.into_iter().map(Fixture::from).collect();
    fixtures.sort_by(|a, b| match (&a.date, &b.date) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    Ok(fixtures)
}

pub struct FifaFixturesClient {
    client: reqwest::Client,
}

impl Default for FifaFixturesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FifaFixturesClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the tournament calendar in the given language
    pub async fn fetch_fixtures(&self, language: &str, count: u32) -> Result<Vec<Fixture>> {
        let count = count.to_string();
        let response = self
            .client
            .get(FIFA_API_URL)
            .query(&[
                ("language", language),
                ("count", count.as_str()),
                ("idSeason", FIFA_SEASON_ID),
            ])
            .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to fetch fixtures from the FIFA API")?;

        if !response.status().is_success() {
            anyhow::bail!("FIFA API returned error: {}", response.status());
        }

        let body = response.text().await.context("Failed to read FIFA API response")?;
        let fixtures = parse_fixtures(&body)?;
        info!("Fetched {} fixtures", fixtures.len());
        Ok(fixtures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDAR: &str = r#"{
        "Results": [
            {
                "IdMatch": "400021467",
                "MatchNumber": 2,
                "StageName": [{"Locale": "es-ES", "Description": "Primera fase"}],
                "GroupName": [{"Locale": "es-ES", "Description": "Grupo A"}],
                "Date": "2026-06-12T02:00:00Z",
                "Home": {"TeamName": [{"Locale": "es-ES", "Description": "República de Corea"}]},
                "Away": null,
                "Stadium": {
                    "Name": [{"Locale": "es-ES", "Description": "Estadio Guadalajara"}],
                    "CityName": [{"Locale": "es-ES", "Description": "Guadalajara"}]
                },
                "HomeTeamScore": null,
                "AwayTeamScore": null,
                "MatchStatus": 1
            },
            {
                "MatchNumber": 104,
                "StageName": [{"Locale": "es-ES", "Description": "Final"}],
                "Date": null,
                "MatchStatus": 1
            },
            {
                "IdMatch": "400021465",
                "MatchNumber": 1,
                "Date": "2026-06-11T19:00:00Z",
                "Home": {
                    "TeamName": [{"Locale": "es-ES", "Description": "México"}],
                    "Abbreviation": "MEX"
                },
                "Away": {"TeamName": [], "Abbreviation": "RSA"},
                "HomeTeamScore": 2,
                "AwayTeamScore": 1,
                "MatchStatus": 0
            }
        ]
    }"#;

    #[test]
    fn test_parse_fixtures_orders_by_date() {
        let fixtures = parse_fixtures(CALENDAR).unwrap();
        let numbers: Vec<Option<u32>> = fixtures.iter().map(|f| f.match_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(104)]);

        let opener = &fixtures[0];
        assert_eq!(opener.home_team.as_deref(), Some("México"));
        // Falls back to the abbreviation when no localised name is present
        assert_eq!(opener.away_team.as_deref(), Some("RSA"));

        let second = &fixtures[1];
        assert_eq!(second.group.as_deref(), Some("Grupo A"));
        assert_eq!(second.city.as_deref(), Some("Guadalajara"));
        assert_eq!(second.away_team, None);
    }

    #[test]
    fn test_fixture_to_match() {
        let fixtures = parse_fixtures(CALENDAR).unwrap();

        let opener = fixtures[0].to_match().unwrap();
        assert_eq!(opener.id, "400021465");
        assert_eq!(opener.status, "finished");
        assert_eq!(opener.home_flag.as_deref(), Some("🇲🇽"));
        assert_eq!(opener.time.as_deref(), Some("19:00"));
        assert_eq!(opener.final_score().unwrap().to_string(), "2-1");

        let second = fixtures[1].to_match().unwrap();
        assert_eq!(second.away_team, "TBD");
        assert_eq!(second.away_flag.as_deref(), Some("🏴"));
        assert_eq!(second.status, "upcoming");
        assert_eq!(second.date.to_string(), "2026-06-12");
        assert_eq!(second.time.as_deref(), Some("02:00"));

        // No kickoff date, nothing to schedule
        assert!(fixtures[2].to_match().is_none());
    }

    #[test]
    fn test_wire_status_codes() {
        let mut fixture = parse_fixtures(CALENDAR).unwrap().remove(1);
        fixture.match_status = Some(2);
        assert_eq!(fixture.wire_status(), "live");
        fixture.match_status = None;
        assert_eq!(fixture.wire_status(), "upcoming");
    }

    #[test]
    fn test_empty_calendar_is_an_error() {
        assert!(parse_fixtures(r#"{"Results": []}"#).is_err());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_fixtures() {
        let client = FifaFixturesClient::new();
        let fixtures = client.fetch_fixtures("es", 500).await.unwrap();
        assert!(!fixtures.is_empty());
    }
}
