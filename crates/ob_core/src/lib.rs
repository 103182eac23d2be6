//! # ob_core - Deterministic Monte Carlo Baseball Season Simulation
//!
//! This library replays a fixed league schedule many times with a
//! plate-appearance-level game engine and reports each team's expected
//! win total plus aggregated batting lines.
//!
//! ## Features
//! - 100% deterministic runs (same seed = same report, sequential or parallel)
//! - Plate-appearance state machine with real baserunning and extra innings
//! - Parallel replications on rayon with bit-identical output
//! - JSON API for easy integration

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

// Re-export main API functions
pub use api::{
    build_league, build_schedule, simulate_season, simulate_season_json, MatchupData, PlayerData,
    SeasonRequest, SeasonResponse, TeamData, SCHEMA_VERSION,
};
pub use error::{Result, SimError};

// Re-export engine types
pub use engine::{
    sample_outcome, GameEngine, GameSummary, PlateOutcome, SeasonSimulator, SimConfig, StatWindow,
};

// Re-export model types
pub use models::{
    BattingLine, League, Matchup, Player, PlayerLine, RateLine, Schedule, SeasonReport, Team,
    TeamStanding, RATE_SUM_TOLERANCE,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
