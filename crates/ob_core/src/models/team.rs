//! Team model: a named batting order plus its season record.

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub lineup: Vec<Player>,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub num_wins: u32,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lineup: Vec::new(),
            games_played: 0,
            num_wins: 0,
        }
    }

    pub fn with_lineup(name: impl Into<String>, lineup: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            lineup,
            games_played: 0,
            num_wins: 0,
        }
    }

    pub fn push_player(&mut self, player: Player) {
        self.lineup.push(player);
    }

    /// A team is playable when it has at least one batter and every rate
    /// line is a valid distribution.
    pub fn validate(&self) -> Result<()> {
        if self.lineup.is_empty() {
            return Err(SimError::EmptyLineup {
                team: self.name.clone(),
            });
        }
        for player in &self.lineup {
            player.validate()?;
        }
        Ok(())
    }

    /// Order the lineup best bat first (descending true batting average).
    /// Ties keep their current relative order.
    pub fn sort_lineup(&mut self) {
        self.lineup
            .sort_by(|a, b| b.rates.true_ba.total_cmp(&a.rates.true_ba));
    }

    pub fn winning_percentage(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.num_wins as f64 / self.games_played as f64
        }
    }

    /// Season record as a "W-L" string.
    pub fn record(&self) -> String {
        format!(
            "{}-{}",
            self.num_wins,
            self.games_played.saturating_sub(self.num_wins)
        )
    }

    pub fn reset_record(&mut self) {
        self.games_played = 0;
        self.num_wins = 0;
    }

    /// Zero every batter's counters, leaving rates and record untouched.
    pub fn reset_lines(&mut self) {
        for player in &mut self.lineup {
            player.line.reset();
        }
    }
}
