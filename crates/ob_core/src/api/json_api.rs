//! JSON API for season simulation.
//!
//! One request carries the league, the schedule, and the run knobs; the
//! response carries the full season report. Front ends and batch tooling
//! talk to the engine through this surface so they never touch internal
//! model types directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json;
use tracing::{debug, info};

use crate::engine::{SeasonSimulator, SimConfig, StatWindow};
use crate::error::{Result, SimError};
use crate::models::{
    League, Matchup, Player, PlayerLine, RateLine, Schedule, SeasonReport, Team, TeamStanding,
};

/// Request/response schema version this build speaks.
pub const SCHEMA_VERSION: u32 = 1;

/// Season simulation request (schema_version = 1).
#[derive(Debug, Deserialize)]
pub struct SeasonRequest {
    pub schema_version: u32,
    /// Base seed for the run. Same seed, same report.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_replications")]
    pub replications: u32,
    #[serde(default)]
    pub stat_window: StatWindow,
    /// Run replications on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    /// Optional diagnostic inning guard, minimum 9.
    #[serde(default)]
    pub max_innings: Option<u32>,
    pub teams: Vec<TeamData>,
    pub schedule: Vec<MatchupData>,
}

fn default_replications() -> u32 {
    SimConfig::default().replications
}

#[derive(Debug, Deserialize)]
pub struct TeamData {
    pub name: String,
    /// Batting order, first hitter first.
    pub players: Vec<PlayerData>,
}

/// One batter with season-long outcome rates.
#[derive(Debug, Deserialize)]
pub struct PlayerData {
    pub name: String,
    /// Source season years, e.g. [2023, 2024]. Informational.
    #[serde(default)]
    pub seasons: Vec<u16>,
    pub true_ba: f64,
    pub walk_rate: f64,
    pub single_rate: f64,
    pub double_rate: f64,
    pub triple_rate: f64,
    pub homer_rate: f64,
}

/// One scheduled game, teams referenced by name.
#[derive(Debug, Deserialize)]
pub struct MatchupData {
    pub away: String,
    pub home: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeasonResponse {
    pub schema_version: u32,
    pub replications: u32,
    pub seed: u64,
    pub expected_wins: std::collections::BTreeMap<String, f64>,
    pub standings: Vec<TeamStanding>,
    pub players: Vec<PlayerLine>,
}

impl SeasonResponse {
    pub fn from_report(report: SeasonReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            replications: report.replications,
            seed: report.seed,
            expected_wins: report.expected_wins,
            standings: report.standings,
            players: report.players,
        }
    }
}

/// Convert request teams into a league. Fails on duplicate team names;
/// rate distributions are checked later when the run starts.
pub fn build_league(teams: Vec<TeamData>) -> Result<League> {
    League::new(teams.into_iter().map(convert_team).collect())
}

/// Resolve name-based matchups against the league roster.
pub fn build_schedule(games: Vec<MatchupData>, league: &League) -> Result<Schedule> {
    let mut schedule = Schedule::new(Vec::with_capacity(games.len()));
    for game in games {
        let away = league.require_index(&game.away)?;
        let home = league.require_index(&game.home)?;
        schedule.push(match game.date {
            Some(date) => Matchup::on(away, home, date),
            None => Matchup::new(away, home),
        });
    }
    Ok(schedule)
}

fn convert_team(data: TeamData) -> Team {
    let TeamData { name, players } = data;
    Team::with_lineup(name, players.into_iter().map(convert_player).collect())
}

fn convert_player(data: PlayerData) -> Player {
    let PlayerData {
        name,
        seasons,
        true_ba,
        walk_rate,
        single_rate,
        double_rate,
        triple_rate,
        homer_rate,
    } = data;
    Player::new(
        name,
        seasons,
        RateLine {
            true_ba,
            walk_rate,
            single_rate,
            double_rate,
            triple_rate,
            homer_rate,
        },
    )
}

/// Run a full season request. The league, schedule, and config are all
/// validated before the first game is played.
pub fn simulate_season(request: SeasonRequest) -> Result<SeasonResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::SchemaVersionMismatch {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let SeasonRequest {
        seed,
        replications,
        stat_window,
        parallel,
        max_innings,
        teams,
        schedule,
        ..
    } = request;

    if teams.is_empty() {
        return Err(SimError::InvalidConfig(
            "request contains no teams".to_string(),
        ));
    }
    if schedule.is_empty() {
        return Err(SimError::InvalidConfig(
            "request contains no scheduled games".to_string(),
        ));
    }

    info!(
        "season request: {} teams, {} scheduled games, {} replications",
        teams.len(),
        schedule.len(),
        replications
    );

    let mut league = build_league(teams)?;
    let schedule = build_schedule(schedule, &league)?;
    let config = SimConfig {
        replications,
        seed,
        stat_window,
        parallel,
        max_innings,
    };

    let report = SeasonSimulator::new(config).run(&mut league, &schedule)?;
    debug!(
        "season request complete: {} standings rows, {} player lines",
        report.standings.len(),
        report.players.len()
    );
    Ok(SeasonResponse::from_report(report))
}

/// String-in, string-out wrapper around [`simulate_season`].
pub fn simulate_season_json(request_json: &str) -> Result<String> {
    let request: SeasonRequest = serde_json::from_str(request_json)?;
    let response = simulate_season(request)?;
    Ok(serde_json::to_string(&response)?)
}
