pub mod league;
pub mod player;
pub mod report;
pub mod team;

pub use league::{League, Matchup, Schedule};
pub use player::{BattingLine, Player, RateLine, RATE_SUM_TOLERANCE};
pub use report::{PlayerLine, SeasonReport, TeamStanding};
pub use team::Team;
