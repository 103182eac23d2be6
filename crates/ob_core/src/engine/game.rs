//! Single-game driver.
//!
//! `GameEngine` wires the sampler, the lineup rotation and the state machine
//! together: sample the current batter, apply the outcome, check for a final
//! score, repeat. One engine value is reused for every game of a replication
//! so the state allocation happens once.

use rand::Rng;
use serde::Serialize;
use std::fmt;

use super::game_state::{GameState, Half};
use super::sampler::sample_outcome;
use crate::error::{Result, SimError};
use crate::models::team::Team;

/// Final score card for one completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub away_team: String,
    pub home_team: String,
    pub away_runs: u32,
    pub home_runs: u32,
    /// Inning in which the last plate appearance happened (9 for a
    /// regulation game, more in extras).
    pub innings: u32,
    pub home_won: bool,
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {} (F{})",
            self.away_team,
            self.away_runs,
            self.home_team,
            self.home_runs,
            if self.innings == 9 {
                String::new()
            } else {
                format!("/{}", self.innings)
            }
        )
    }
}

/// Plays complete games between two teams.
pub struct GameEngine {
    state: GameState,
    away_cursor: usize,
    home_cursor: usize,
    max_innings: Option<u32>,
}

impl GameEngine {
    /// `max_innings`: optional diagnostic guard, see
    /// [`SimConfig::max_innings`](super::config::SimConfig::max_innings).
    pub fn new(max_innings: Option<u32>) -> Self {
        Self {
            state: GameState::new(),
            away_cursor: 0,
            home_cursor: 0,
            max_innings,
        }
    }

    /// Play one game to completion.
    ///
    /// Batting orders rotate one slot per plate appearance, wrapping past
    /// the ninth spot, and both rotations restart at the leadoff batter
    /// every game. Wins, games played and batting lines are written back
    /// into the two teams; the returned summary is the box-score view.
    pub fn play<R: Rng + ?Sized>(
        &mut self,
        away: &mut Team,
        home: &mut Team,
        rng: &mut R,
    ) -> Result<GameSummary> {
        if away.lineup.is_empty() {
            return Err(SimError::EmptyLineup {
                team: away.name.clone(),
            });
        }
        if home.lineup.is_empty() {
            return Err(SimError::EmptyLineup {
                team: home.name.clone(),
            });
        }

        self.away_cursor = 0;
        self.home_cursor = 0;
        let mut last_pa_inning = 1;

        while !self.state.is_final() {
            if let Some(cap) = self.max_innings {
                if self.state.inning > cap {
                    let inning = self.state.inning;
                    self.state.reset();
                    return Err(SimError::MaxInningsExceeded { inning });
                }
            }

            let (team, cursor) = match self.state.half {
                Half::Top => (&mut *away, &mut self.away_cursor),
                Half::Bottom => (&mut *home, &mut self.home_cursor),
            };
            let len = team.lineup.len();
            let batter = &mut team.lineup[*cursor];
            *cursor = (*cursor + 1) % len;

            last_pa_inning = self.state.inning;
            let outcome = sample_outcome(&batter.rates, rng);
            batter.line.record(outcome);
            let runs = self.state.apply(outcome);

            if runs > 0 {
                log::trace!(
                    "{} {} scores {} ({} {}-{})",
                    batter.name,
                    outcome.label(),
                    runs,
                    last_pa_inning,
                    self.state.score.away,
                    self.state.score.home
                );
            }
        }

        let score = self.state.score;
        let home_won = score.home > score.away;
        if home_won {
            home.num_wins += 1;
        } else {
            away.num_wins += 1;
        }
        away.games_played += 1;
        home.games_played += 1;

        let summary = GameSummary {
            away_team: away.name.clone(),
            home_team: home.name.clone(),
            away_runs: score.away,
            home_runs: score.home,
            innings: last_pa_inning,
            home_won,
        };
        log::debug!("final: {}", summary);

        // Same engine value serves the next game.
        self.state.reset();
        Ok(summary)
    }
}
