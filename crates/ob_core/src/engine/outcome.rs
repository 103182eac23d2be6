use serde::{Deserialize, Serialize};

/// Resolved result of a single plate appearance.
///
/// This is the only vocabulary the state machine understands: every pitch
/// sequence, fielding play and baserunning decision is collapsed into one of
/// these six terminal events before it reaches [`GameState::apply`].
///
/// [`GameState::apply`]: super::game_state::GameState::apply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum PlateOutcome {
    Out,
    Walk,
    Single,
    Double,
    Triple,
    HomeRun,
}

impl PlateOutcome {
    /// True for the four outcomes that count as a hit.
    pub fn is_hit(self) -> bool {
        matches!(
            self,
            PlateOutcome::Single | PlateOutcome::Double | PlateOutcome::Triple | PlateOutcome::HomeRun
        )
    }

    /// Scorebook label, used in trace logs and report rendering.
    pub fn label(self) -> &'static str {
        match self {
            PlateOutcome::Out => "out",
            PlateOutcome::Walk => "BB",
            PlateOutcome::Single => "1B",
            PlateOutcome::Double => "2B",
            PlateOutcome::Triple => "3B",
            PlateOutcome::HomeRun => "HR",
        }
    }
}
