pub mod json_api;

pub use json_api::{
    build_league, build_schedule, simulate_season, simulate_season_json, MatchupData, PlayerData,
    SeasonRequest, SeasonResponse, TeamData, SCHEMA_VERSION,
};
