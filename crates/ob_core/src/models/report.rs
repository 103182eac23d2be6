//! Season report: expected win totals and aggregated batting lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::player::BattingLine;

/// One team's row in the final standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: String,
    /// Mean wins per simulated season across all replications.
    pub expected_wins: f64,
    /// Games the schedule gives this team in one season.
    pub games: u32,
}

impl TeamStanding {
    pub fn expected_losses(&self) -> f64 {
        self.games as f64 - self.expected_wins
    }

    pub fn expected_percentage(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.expected_wins / self.games as f64
        }
    }
}

/// One batter's aggregated line at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub name: String,
    pub team: String,
    pub line: BattingLine,
    pub observed_ba: f64,
    pub observed_walk_rate: f64,
}

/// Everything one season run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub replications: u32,
    pub seed: u64,
    /// Expected wins keyed by team name. A BTreeMap keeps serialized
    /// output byte-stable across runs with the same seed.
    pub expected_wins: BTreeMap<String, f64>,
    /// Standings sorted best team first.
    pub standings: Vec<TeamStanding>,
    /// Batting lines in roster order, grouped by team.
    pub players: Vec<PlayerLine>,
}

impl SeasonReport {
    pub fn top_team(&self) -> Option<&TeamStanding> {
        self.standings.first()
    }

    /// Standings as a fixed-width console table.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<24} {:>8} {:>8} {:>7}\n",
            "Team", "Exp W", "Exp L", "Win%"
        ));
        out.push_str(&"-".repeat(50));
        out.push('\n');
        for standing in &self.standings {
            out.push_str(&format!(
                "{:<24} {:>8.2} {:>8.2} {:>7.3}\n",
                standing.team,
                standing.expected_wins,
                standing.expected_losses(),
                standing.expected_percentage()
            ));
        }
        out.push_str(&format!(
            "({} replications, seed {})\n",
            self.replications, self.seed
        ));
        out
    }

    /// Batting lines for one team as a console table.
    pub fn render_player_table(&self, team: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<20} {:>7} {:>6} {:>5} {:>5} {:>5} {:>5} {:>6} {:>7} {:>7}\n",
            "Player", "PA", "H", "1B", "2B", "3B", "HR", "BB", "BA", "BB%"
        ));
        out.push_str(&"-".repeat(80));
        out.push('\n');
        for player in self.players.iter().filter(|p| p.team == team) {
            out.push_str(&format!(
                "{:<20} {:>7} {:>6} {:>5} {:>5} {:>5} {:>5} {:>6} {:>7.3} {:>7.3}\n",
                player.name,
                player.line.pa,
                player.line.hits,
                player.line.singles,
                player.line.doubles,
                player.line.triples,
                player.line.homers,
                player.line.walks,
                player.observed_ba,
                player.observed_walk_rate
            ));
        }
        out
    }
}
