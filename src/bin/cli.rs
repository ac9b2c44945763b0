use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use prode::config::AppConfig;
use prode::countdown::{next_kickoff, time_left};
use prode::data::{load_from_cache, save_ranking_to_csv, save_to_cache};
use prode::edit_gate::GateBook;
use prode::fifa_fixtures::{FifaFixturesClient, Fixture};
use prode::filters::partition_by_status;
use prode::grader::{grade, ScoringProfile};
use prode::match_view::MatchView;
use prode::predictor_api::PredictorApiClient;
use prode::session::{login, logout};
use prode::{load_prode_data, Score, ScoringSystem};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prode", about = "World Cup prediction pool companion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grade a single prediction against a final score
    Grade {
        /// Predicted score, e.g. 2-1
        #[arg(long)]
        prediction: Score,
        /// Final score, e.g. 3-0
        #[arg(long = "final")]
        final_score: Score,
        #[arg(long, default_value = "classic")]
        system: ScoringSystem,
    },
    /// Show a group's standings, graded locally when results are in
    Ranking {
        #[arg(long)]
        group: String,
        /// Also write the standings to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List matches with their status and your predictions
    Matches,
    /// Submit or replace a prediction while the match is still open
    Predict {
        #[arg(long = "match")]
        match_id: String,
        /// Predicted score, e.g. 2-1
        #[arg(long)]
        score: Score,
    },
    /// Create a prediction group; you become its admin
    CreateGroup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "classic")]
        system: ScoringSystem,
    },
    /// Join a group with its invite code
    JoinGroup {
        #[arg(long)]
        code: String,
    },
    /// Download the tournament calendar from FIFA
    Fixtures {
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long, default_value_t = 500)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Grade {
            prediction,
            final_score,
            system,
        } => run_grade(prediction, final_score, system.profile()),
        Command::Ranking { group, csv } => run_ranking(&config, &group, csv).await,
        Command::Matches => run_matches(&config).await,
        Command::Predict { match_id, score } => run_predict(&config, &match_id, score).await,
        Command::CreateGroup {
            name,
            description,
            system,
        } => run_create_group(&config, &name, description.as_deref(), system).await,
        Command::JoinGroup { code } => run_join_group(&config, &code).await,
        Command::Fixtures {
            out,
            language,
            count,
        } => run_fixtures(&config, out, language, count).await,
    }
}

fn run_grade(prediction: Score, final_score: Score, profile: ScoringProfile) -> Result<()> {
    let outcome = grade(prediction, final_score);
    let awarded = profile.award(prediction, final_score);
    println!("Prediction {} vs final {}: {:?}", prediction, final_score, outcome);
    if awarded.goal_difference_hit {
        println!("Goal difference matched");
    }
    println!("Points: {}", awarded.points);
    Ok(())
}

async fn run_ranking(config: &AppConfig, group_id: &str, csv: Option<PathBuf>) -> Result<()> {
    let client = PredictorApiClient::new(config.api_base_url.clone());
    let session = login(&client, &config.credentials()?).await?;
    let data = load_prode_data(config, &client, &session).await?;

    let group = data
        .group(group_id)
        .with_context(|| format!("Group {} not found or not visible", group_id))?;
    let standings = data.standings(group_id).unwrap_or_default();

    println!("{} ({})\n", group.name, group.scoring_system.description());
    if standings.is_empty() {
        println!("No members to rank.");
    }
    for entry in &standings {
        println!("{}", entry.format());
    }

    if let Some(path) = csv {
        save_ranking_to_csv(&standings, &path)?;
        println!("\nSaved ranking to {}", path.display());
    }

    logout(session);
    Ok(())
}

async fn run_matches(config: &AppConfig) -> Result<()> {
    let client = PredictorApiClient::new(config.api_base_url.clone());
    let session = login(&client, &config.credentials()?).await?;
    let matches = client
        .fetch_matches(&session, None)
        .await
        .context("Failed to fetch matches")?;

    let mut gates = GateBook::new();
    gates.observe_all(&matches);
    let buckets = partition_by_status(&matches);

    let sections = [
        ("UPCOMING", &buckets.upcoming),
        ("IN PROGRESS", &buckets.in_progress),
        ("FINISHED", &buckets.finished),
        ("UNAVAILABLE", &buckets.unknown),
    ];
    for (title, bucket) in sections {
        if bucket.is_empty() {
            continue;
        }
        println!("{}\n", title);
        for (i, m) in bucket.iter().enumerate() {
            let view = MatchView::new(m, gates.gate(&m.id), None);
            println!("{}. {}", i + 1, view.format());
        }
        println!();
    }

    let now = Utc::now();
    if let Some(next) = next_kickoff(&matches, now) {
        println!("Next kickoff: {} in {}", next.title(), time_left(next.kickoff(), now));
    }

    logout(session);
    Ok(())
}

async fn run_predict(config: &AppConfig, match_id: &str, score: Score) -> Result<()> {
    let client = PredictorApiClient::new(config.api_base_url.clone());
    let session = login(&client, &config.credentials()?).await?;
    let matches = client.fetch_matches(&session, None).await?;
    let m = matches
        .iter()
        .find(|m| m.id == match_id)
        .with_context(|| format!("Match {} not found", match_id))?;

    let mut gates = GateBook::new();
    let gate = gates.observe(m);
    let saved = client.submit_prediction(&session, m, gate, score).await?;
    println!(
        "Saved prediction {}-{} for {}",
        saved.home_score,
        saved.away_score,
        m.title()
    );

    logout(session);
    Ok(())
}

async fn run_create_group(
    config: &AppConfig,
    name: &str,
    description: Option<&str>,
    system: ScoringSystem,
) -> Result<()> {
    let client = PredictorApiClient::new(config.api_base_url.clone());
    let session = login(&client, &config.credentials()?).await?;
    let group = client
        .create_group(&session, name, description, system)
        .await
        .context("Failed to create group")?;
    println!(
        "Created {} ({}). Invite code: {}",
        group.name, group.scoring_system, group.invite_code
    );

    logout(session);
    Ok(())
}

async fn run_join_group(config: &AppConfig, code: &str) -> Result<()> {
    let client = PredictorApiClient::new(config.api_base_url.clone());
    let session = login(&client, &config.credentials()?).await?;
    let group = client
        .join_group(&session, code)
        .await
        .context("Failed to join group")?;
    println!("Joined {} ({} players)", group.name, group.player_count);

    logout(session);
    Ok(())
}

async fn run_fixtures(
    config: &AppConfig,
    out: Option<PathBuf>,
    language: Option<String>,
    count: u32,
) -> Result<()> {
    let cache_file = out.unwrap_or_else(|| config.cache_file("fixtures.json"));
    let language = language.unwrap_or_else(|| config.fifa_language.clone());

    let fixtures: Vec<Fixture> = if config.use_cache && cache_file.exists() {
        println!("Loading fixtures from cache file: {}\n", cache_file.display());
        load_from_cache(&cache_file)?
    } else {
        let fixtures = FifaFixturesClient::new()
            .fetch_fixtures(&language, count)
            .await
            .context("Failed to fetch FIFA fixtures")?;
        save_to_cache(&fixtures, &cache_file)?;
        println!("Saved fixtures to cache file: {}\n", cache_file.display());
        fixtures
    };

    let scheduled: Vec<_> = fixtures.iter().filter_map(Fixture::to_match).collect();
    for m in &scheduled {
        let place = m.city.as_deref().unwrap_or("TBD");
        println!(
            "#{:<3} {} {} | {} | {}",
            m.match_number.unwrap_or_default(),
            m.kickoff().format("%Y-%m-%d %H:%M"),
            m.title(),
            m.group.as_deref().or(m.stage.as_deref()).unwrap_or(""),
            place
        );
    }
    println!(
        "\n{} fixtures, {} without a kickoff date",
        fixtures.len(),
        fixtures.len() - scheduled.len()
    );
    Ok(())
}
