//! Simulation engine: outcome sampling, the game state machine, the single
//! game driver and the Monte Carlo season driver.

pub mod config;
pub mod game;
pub mod game_state;
pub mod outcome;
pub mod sampler;
pub mod season;


pub use config::{SimConfig, StatWindow};
pub use game::{GameEngine, GameSummary};
pub use game_state::{Bases, GameState, Half, Score};
pub use outcome::PlateOutcome;
pub use sampler::sample_outcome;
pub use season::SeasonSimulator;
