use serde::{Deserialize, Serialize};

use super::team::{Half, TeamSide};

/// Journal entry for a successfully applied action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvent {
    /// Logical clock value when the action was applied
    pub elapsed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSide>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    TeamSaved { players: usize },
    StartersRegistered { starters: Vec<u32> },
    StartersReopened,
    PositionSet { number: u32, position: Option<String> },
    ClockStarted,
    ClockPaused,
    ClockReset,
    HalfChanged { half: Half },
    Substitution { out: u32, incoming: u32 },
    RetroactiveSubstitution { out: u32, incoming: u32, mark: f64, half: Half },
    Exclusion { number: u32, penalty_index: usize, auto_ejected: bool },
    /// `slot_of` is the player whose expired penalty opened the slot
    Return { number: u32, slot_of: u32 },
    Ejection { number: u32, team_penalty: bool },
}

impl MatchEvent {
    pub fn new(elapsed: f64, team: Option<TeamSide>, kind: EventKind) -> Self {
        Self { elapsed, team, kind }
    }
}
