use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid outcome distribution for {player}: {detail}")]
    InvalidDistribution { player: String, detail: String },

    #[error("team {team} has an empty lineup")]
    EmptyLineup { team: String },

    #[error("player name mismatch: {left} vs {right}")]
    NameMismatch { left: String, right: String },

    #[error("schedule references unknown team: {name}")]
    UnknownTeam { name: String },

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("game passed the inning guard without resolving (inning {inning})")]
    MaxInningsExceeded { inning: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema version mismatch: found {found}, expected {expected}")]
    SchemaVersionMismatch { found: u32, expected: u32 },
}

impl SimError {
    /// True for errors caused by bad input data rather than a runaway
    /// simulation. Callers can surface these directly to the user.
    pub fn is_input_error(&self) -> bool {
        match self {
            SimError::InvalidDistribution { .. } => true,
            SimError::EmptyLineup { .. } => true,
            SimError::NameMismatch { .. } => true,
            SimError::UnknownTeam { .. } => true,
            SimError::InvalidConfig(_) => true,
            SimError::Json(_) => true,
            SimError::SchemaVersionMismatch { .. } => true,
            SimError::MaxInningsExceeded { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
