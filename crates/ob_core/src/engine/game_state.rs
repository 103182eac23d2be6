//! In-game state machine: innings, half-inning flow, outs, bases and score.
//!
//! The machine consumes [`PlateOutcome`] events one at a time and owns every
//! baserunning rule in the engine. Advancement is station-to-station: runners
//! move exactly as far as the batter entitles them, extra bases are never
//! taken and outs on the bases never occur.

use super::outcome::PlateOutcome;

/// Batting half of an inning. The away side bats in the top half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Half {
    #[default]
    Top,
    Bottom,
}

impl Half {
    pub fn flip(self) -> Self {
        match self {
            Half::Top => Half::Bottom,
            Half::Bottom => Half::Top,
        }
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Half::Bottom)
    }
}

/// Occupancy of first, second and third base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bases {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl Bases {
    pub fn new(first: bool, second: bool, third: bool) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    /// Number of occupied bases (0-3).
    pub fn runners(self) -> u32 {
        self.first as u32 + self.second as u32 + self.third as u32
    }

    pub fn is_loaded(self) -> bool {
        self.first && self.second && self.third
    }

    pub fn is_empty(self) -> bool {
        !(self.first || self.second || self.third)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Running line score, away and home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Score {
    pub away: u32,
    pub home: u32,
}

impl Score {
    /// Credit `runs` to whichever side bats in `half`.
    pub fn credit(&mut self, half: Half, runs: u32) {
        match half {
            Half::Top => self.away += runs,
            Half::Bottom => self.home += runs,
        }
    }

    pub fn is_tied(self) -> bool {
        self.away == self.home
    }

    pub fn total(self) -> u32 {
        self.away + self.home
    }
}

/// Complete between-pitch state of one game.
///
/// Invariants held between calls to [`apply`](Self::apply):
/// - `inning >= 1`
/// - `outs <= 2` (the third out is consumed by the half-inning turnover)
/// - the bases are empty at the start of every half-inning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub inning: u32,
    pub half: Half,
    pub outs: u8,
    pub bases: Bases,
    pub score: Score,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            inning: 1,
            half: Half::Top,
            outs: 0,
            bases: Bases::default(),
            score: Score::default(),
        }
    }

    /// Rewind to the first pitch of a fresh game. The game driver calls this
    /// after every completed game so one state value serves a whole season.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the machine by one plate appearance and return the runs it
    /// scored. Runs are credited to the batting side immediately, so the
    /// score is current after every event.
    pub fn apply(&mut self, outcome: PlateOutcome) -> u32 {
        let batting = self.half;
        let runs = match outcome {
            PlateOutcome::Out => {
                self.outs += 1;
                if self.outs == 3 {
                    self.end_half_inning();
                }
                0
            }
            PlateOutcome::Walk => self.apply_walk(),
            PlateOutcome::Single => {
                // Runners on second and third score, first moves to second.
                let runs = self.bases.second as u32 + self.bases.third as u32;
                self.bases = Bases::new(true, self.bases.first, false);
                runs
            }
            PlateOutcome::Double => {
                let runs = self.bases.second as u32 + self.bases.third as u32;
                self.bases = Bases::new(false, true, self.bases.first);
                runs
            }
            PlateOutcome::Triple => {
                let runs = self.bases.runners();
                self.bases = Bases::new(false, false, true);
                runs
            }
            PlateOutcome::HomeRun => {
                let runs = self.bases.runners() + 1;
                self.bases.clear();
                runs
            }
        };
        self.score.credit(batting, runs);
        runs
    }

    /// A walk advances only forced runners. Occupancy-wise that is a single
    /// insertion at the lowest open base, with a run scoring (and the bases
    /// staying loaded) only when no base is open.
    fn apply_walk(&mut self) -> u32 {
        if self.bases.is_loaded() {
            1
        } else {
            if !self.bases.first {
                self.bases.first = true;
            } else if !self.bases.second {
                self.bases.second = true;
            } else {
                self.bases.third = true;
            }
            0
        }
    }

    /// Third out: hand the bats over, reset outs, strand the runners.
    /// The inning number advances when a bottom half ends.
    fn end_half_inning(&mut self) {
        if self.half.is_bottom() {
            self.inning += 1;
        }
        self.half = self.half.flip();
        self.outs = 0;
        self.bases.clear();
    }

    /// Completion check, evaluated by the game driver after every plate
    /// appearance.
    ///
    /// A game is final once nine innings are complete and the score is not
    /// tied, or as soon as the home side leads in the bottom of the ninth or
    /// any later inning (the walk-off rule). Ties always extend the game.
    pub fn is_final(&self) -> bool {
        if self.inning > 9 && !self.score.is_tied() {
            return true;
        }
        self.inning >= 9 && self.half.is_bottom() && self.score.home > self.score.away
    }
}
