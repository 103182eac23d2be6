//! Player model: immutable plate-appearance rates plus mutable counters.
//!
//! A player's offensive profile is six measured rates. The engine never
//! mutates them; everything that happens during simulation lands in the
//! [`BattingLine`] counters instead, so the same roster can be replayed any
//! number of times.

use serde::{Deserialize, Serialize};

use crate::engine::outcome::PlateOutcome;
use crate::error::{Result, SimError};

/// Maximum allowed deviation when a probability group must sum to 1.0.
pub const RATE_SUM_TOLERANCE: f64 = 0.001;

/// Per-plate-appearance outcome rates for one batter.
///
/// `true_ba` and `walk_rate` partition the plate appearance together with the
/// implied out probability. The four hit-type rates are conditional on a hit
/// and must form their own distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLine {
    pub true_ba: f64,
    pub walk_rate: f64,
    pub single_rate: f64,
    pub double_rate: f64,
    pub triple_rate: f64,
    pub homer_rate: f64,
}

impl RateLine {
    /// Probability that the plate appearance ends in an out.
    pub fn out_rate(&self) -> f64 {
        (1.0 - self.true_ba - self.walk_rate).max(0.0)
    }

    /// Check every distribution rule, naming `player` in any error.
    ///
    /// Rules:
    /// 1. Each rate lies in [0, 1] (NaN and infinities fail this check)
    /// 2. `true_ba + walk_rate` leaves a non-negative out probability
    /// 3. The hit-type split sums to 1.0 within [`RATE_SUM_TOLERANCE`]
    pub fn validate(&self, player: &str) -> Result<()> {
        let named = [
            ("true_ba", self.true_ba),
            ("walk_rate", self.walk_rate),
            ("single_rate", self.single_rate),
            ("double_rate", self.double_rate),
            ("triple_rate", self.triple_rate),
            ("homer_rate", self.homer_rate),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidDistribution {
                    player: player.to_string(),
                    detail: format!("{} = {} is outside [0, 1]", name, value),
                });
            }
        }

        let pa_sum = self.true_ba + self.walk_rate;
        if pa_sum > 1.0 + RATE_SUM_TOLERANCE {
            return Err(SimError::InvalidDistribution {
                player: player.to_string(),
                detail: format!(
                    "hit + walk probability {:.6} leaves a negative out probability",
                    pa_sum
                ),
            });
        }

        let split_sum = self.single_rate + self.double_rate + self.triple_rate + self.homer_rate;
        let deviation = (split_sum - 1.0).abs();
        if deviation > RATE_SUM_TOLERANCE {
            return Err(SimError::InvalidDistribution {
                player: player.to_string(),
                detail: format!(
                    "hit-type split sums to {:.6}, deviates from 1.0 by {:.6} (tolerance: {:.6})",
                    split_sum, deviation, RATE_SUM_TOLERANCE
                ),
            });
        }

        Ok(())
    }
}

/// Counting stats accumulated while a player bats in simulated games.
///
/// Plain tallies only; derived rates are computed on demand so partial
/// windows never carry stale averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattingLine {
    pub pa: u64,
    pub hits: u64,
    pub singles: u64,
    pub doubles: u64,
    pub triples: u64,
    pub homers: u64,
    pub walks: u64,
}

impl BattingLine {
    /// Tally one plate appearance.
    pub fn record(&mut self, outcome: PlateOutcome) {
        self.pa += 1;
        if outcome.is_hit() {
            self.hits += 1;
        }
        match outcome {
            PlateOutcome::Out => {}
            PlateOutcome::Walk => self.walks += 1,
            PlateOutcome::Single => self.singles += 1,
            PlateOutcome::Double => self.doubles += 1,
            PlateOutcome::Triple => self.triples += 1,
            PlateOutcome::HomeRun => self.homers += 1,
        }
    }

    /// Fold another line into this one. Used when parallel replications
    /// merge their private counters back into the roster.
    pub fn add(&mut self, other: &BattingLine) {
        self.pa += other.pa;
        self.hits += other.hits;
        self.singles += other.singles;
        self.doubles += other.doubles;
        self.triples += other.triples;
        self.homers += other.homers;
        self.walks += other.walks;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn outs(&self) -> u64 {
        self.pa - self.hits - self.walks
    }

    /// Hits per plate appearance, 0.0 before any appearance.
    pub fn observed_ba(&self) -> f64 {
        if self.pa == 0 {
            0.0
        } else {
            self.hits as f64 / self.pa as f64
        }
    }

    /// Walks per plate appearance, 0.0 before any appearance.
    pub fn observed_walk_rate(&self) -> f64 {
        if self.pa == 0 {
            0.0
        } else {
            self.walks as f64 / self.pa as f64
        }
    }
}

/// A batter: identity, the seasons behind the measured rates, the rates
/// themselves and the counters this simulation has produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub seasons: Vec<u16>,
    pub rates: RateLine,
    #[serde(skip)]
    pub line: BattingLine,
}

impl Player {
    pub fn new(name: impl Into<String>, seasons: Vec<u16>, rates: RateLine) -> Self {
        Self {
            name: name.into(),
            seasons,
            rates,
            line: BattingLine::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.rates.validate(&self.name)
    }

    /// Combine two records of the same player into one multi-year line.
    ///
    /// Each side's rates are weighted by how many seasons back them, over
    /// the deduplicated union of seasons. Counters do not carry over; the
    /// merged player starts with a fresh line.
    pub fn merge(&self, other: &Player) -> Result<Player> {
        if self.name != other.name {
            return Err(SimError::NameMismatch {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }

        let mut seasons: Vec<u16> = self
            .seasons
            .iter()
            .chain(other.seasons.iter())
            .copied()
            .collect();
        seasons.sort_unstable();
        seasons.dedup();

        let denom = seasons.len().max(1) as f64;
        let wl = self.seasons.len() as f64;
        let wr = other.seasons.len() as f64;
        let avg = |a: f64, b: f64| (a * wl + b * wr) / denom;

        Ok(Player {
            name: self.name.clone(),
            rates: RateLine {
                true_ba: avg(self.rates.true_ba, other.rates.true_ba),
                walk_rate: avg(self.rates.walk_rate, other.rates.walk_rate),
                single_rate: avg(self.rates.single_rate, other.rates.single_rate),
                double_rate: avg(self.rates.double_rate, other.rates.double_rate),
                triple_rate: avg(self.rates.triple_rate, other.rates.triple_rate),
                homer_rate: avg(self.rates.homer_rate, other.rates.homer_rate),
            },
            seasons,
            line: BattingLine::default(),
        })
    }
}
