//! Season run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// How long player counters accumulate before being zeroed.
///
/// Team win totals are unaffected; the window governs batting lines only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatWindow {
    /// Reset before every game. Lines in the report describe the last game
    /// each player appeared in.
    PerGame,
    /// Reset before every replication. Lines describe the last season.
    PerReplication,
    /// Never reset during a run. Lines aggregate every plate appearance of
    /// every replication.
    #[default]
    Cumulative,
}

impl StatWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            StatWindow::PerGame => "per_game",
            StatWindow::PerReplication => "per_replication",
            StatWindow::Cumulative => "cumulative",
        }
    }
}

/// Knobs for one season run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Independent seasons to simulate.
    #[serde(default = "default_replications")]
    pub replications: u32,
    /// Base seed; each replication derives its own stream from it.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub stat_window: StatWindow,
    /// Run replications on the rayon pool. Requires the cumulative window
    /// since narrower windows observe sequential game order.
    #[serde(default)]
    pub parallel: bool,
    /// Optional diagnostic guard: abort any game that reaches this inning
    /// without resolving. Unset means extra innings run unbounded.
    #[serde(default)]
    pub max_innings: Option<u32>,
}

fn default_replications() -> u32 {
    10
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            replications: default_replications(),
            seed: 0,
            stat_window: StatWindow::default(),
            parallel: false,
            max_innings: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.replications == 0 {
            return Err(SimError::InvalidConfig(
                "replications must be at least 1".to_string(),
            ));
        }
        if let Some(cap) = self.max_innings {
            if cap < 9 {
                return Err(SimError::InvalidConfig(format!(
                    "inning guard {} would abort regulation games (minimum 9)",
                    cap
                )));
            }
        }
        if self.parallel && self.stat_window != StatWindow::Cumulative {
            return Err(SimError::InvalidConfig(format!(
                "parallel runs require the cumulative stat window, got {}",
                self.stat_window.as_str()
            )));
        }
        Ok(())
    }
}
