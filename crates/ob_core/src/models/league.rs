//! League container and season schedule.
//!
//! The league owns every team for a run and hands the engine disjoint
//! mutable borrows of the two sides of a matchup. Schedules are resolved to
//! team indices up front so the inner game loop never touches a string.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::team::Team;
use crate::error::{Result, SimError};

/// One scheduled game, referencing teams by league index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub away: usize,
    pub home: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Matchup {
    pub fn new(away: usize, home: usize) -> Self {
        Self {
            away,
            home,
            date: None,
        }
    }

    pub fn on(away: usize, home: usize, date: NaiveDate) -> Self {
        Self {
            away,
            home,
            date: Some(date),
        }
    }
}

/// An ordered season schedule. Every replication replays it start to end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    games: Vec<Matchup>,
}

impl Schedule {
    pub fn new(games: Vec<Matchup>) -> Self {
        Self { games }
    }

    /// Resolve (away, home) name pairs against the league, in order.
    pub fn resolve(pairs: &[(&str, &str)], league: &League) -> Result<Self> {
        let mut games = Vec::with_capacity(pairs.len());
        for (away, home) in pairs {
            let away = league.require_index(away)?;
            let home = league.require_index(home)?;
            games.push(Matchup::new(away, home));
        }
        let schedule = Self { games };
        schedule.validate(league)?;
        Ok(schedule)
    }

    /// Home-and-home round robin: every ordered (away, home) pair appears
    /// `games_each` times. Handy for synthetic seasons and benchmarks.
    pub fn round_robin(league: &League, games_each: u32) -> Self {
        let mut games = Vec::new();
        for home in 0..league.len() {
            for away in 0..league.len() {
                if home == away {
                    continue;
                }
                for _ in 0..games_each {
                    games.push(Matchup::new(away, home));
                }
            }
        }
        Self { games }
    }

    pub fn games(&self) -> &[Matchup] {
        &self.games
    }

    pub fn push(&mut self, matchup: Matchup) {
        self.games.push(matchup);
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Number of games `team` plays in one pass of the schedule.
    pub fn games_for(&self, team: usize) -> u32 {
        self.games
            .iter()
            .filter(|m| m.away == team || m.home == team)
            .count() as u32
    }

    /// Every matchup must reference two distinct teams that exist in the
    /// league. Hand-built schedules go through this before a run starts.
    pub fn validate(&self, league: &League) -> Result<()> {
        for matchup in &self.games {
            let worst = matchup.away.max(matchup.home);
            if worst >= league.len() {
                return Err(SimError::InvalidConfig(format!(
                    "matchup references team index {} but the league has {} teams",
                    worst,
                    league.len()
                )));
            }
            if matchup.away == matchup.home {
                return Err(SimError::InvalidConfig(format!(
                    "team {} is scheduled against itself",
                    league.teams()[matchup.away].name
                )));
            }
        }
        Ok(())
    }
}

/// Every team in the simulation, indexable by name.
#[derive(Debug, Clone, Default)]
pub struct League {
    teams: Vec<Team>,
    by_name: HashMap<String, usize>,
}

impl League {
    /// Build a league from teams. Names must be unique since schedules and
    /// reports address teams by name.
    pub fn new(teams: Vec<Team>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(teams.len());
        for (idx, team) in teams.iter().enumerate() {
            if by_name.insert(team.name.clone(), idx).is_some() {
                return Err(SimError::InvalidConfig(format!(
                    "duplicate team name: {}",
                    team.name
                )));
            }
        }
        Ok(Self { teams, by_name })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub(crate) fn teams_mut(&mut self) -> &mut [Team] {
        &mut self.teams
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.index_of(name).map(|idx| &self.teams[idx])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Index lookup that reports the missing name.
    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| SimError::UnknownTeam {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        for team in &self.teams {
            team.validate()?;
        }
        Ok(())
    }

    /// Disjoint mutable borrows of the away and home sides of a matchup.
    /// Callers guarantee the indices are distinct and in range.
    pub(crate) fn pair_mut(&mut self, away: usize, home: usize) -> (&mut Team, &mut Team) {
        debug_assert_ne!(away, home);
        if away < home {
            let (left, right) = self.teams.split_at_mut(home);
            (&mut left[away], &mut right[0])
        } else {
            let (left, right) = self.teams.split_at_mut(away);
            let (home_team, away_team) = (&mut left[home], &mut right[0]);
            (away_team, home_team)
        }
    }

    pub fn reset_records(&mut self) {
        for team in &mut self.teams {
            team.reset_record();
        }
    }

    pub fn reset_lines(&mut self) {
        for team in &mut self.teams {
            team.reset_lines();
        }
    }

    /// Sort every lineup best bat first.
    pub fn sort_lineups(&mut self) {
        for team in &mut self.teams {
            team.sort_lineup();
        }
    }
}
