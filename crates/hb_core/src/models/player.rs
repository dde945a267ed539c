//! Player State Machine
//!
//! ## Transition rules
//! ```text
//! Bench    → Playing   (SubstituteIn, Return)     requires eligible
//! Playing  → Bench     (SubstituteOut)
//! Playing  → Excluded  (Exclude)                  requires eligible
//! Excluded → Playing   (Return)                   requires eligible
//! Playing  → Ejected   (Eject)
//! Excluded → Ejected   (Eject)
//! ```
//! `Ejected` is terminal and clears eligibility. The penalty precondition of
//! `Return` is checked by the engine, which owns the penalty tracker.

use serde::{Deserialize, Serialize};

/// Current state of a rostered player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// On the bench, available to come in
    #[default]
    Bench,

    /// On court
    Playing,

    /// Serving a timed exclusion
    Excluded,

    /// Sent off for the rest of the match
    Ejected,
}

impl PlayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Bench => "bench",
            PlayerState::Playing => "playing",
            PlayerState::Excluded => "excluded",
            PlayerState::Ejected => "ejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlayerState::Ejected)
    }

    /// Target state of `transition` from `self`, ignoring eligibility.
    pub fn target(&self, transition: Transition) -> Option<PlayerState> {
        use PlayerState::*;
        match (self, transition) {
            (Bench, Transition::SubstituteIn) => Some(Playing),
            (Playing, Transition::SubstituteOut) => Some(Bench),
            (Playing, Transition::Exclude) => Some(Excluded),
            (Bench | Excluded, Transition::Return) => Some(Playing),
            (Playing | Excluded, Transition::Eject) => Some(Ejected),
            _ => None,
        }
    }
}

/// Triggers of the player state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    SubstituteIn,
    SubstituteOut,
    Exclude,
    Return,
    Eject,
}

impl Transition {
    fn requires_eligibility(&self) -> bool {
        matches!(self, Transition::SubstituteIn | Transition::Exclude | Transition::Return)
    }
}

/// A rostered player, keyed by shirt number within its team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub number: u32,
    pub state: PlayerState,
    pub eligible: bool,
    pub exclusion_count: u32,
    /// Free-form court position set by the bench (e.g. "GK", "LW")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Player {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            state: PlayerState::Bench,
            eligible: true,
            exclusion_count: 0,
            position: None,
        }
    }

    pub fn can_apply(&self, transition: Transition) -> bool {
        self.next(transition).is_some()
    }

    /// Player after `transition`, or `None` when its guard fails.
    ///
    /// Pure: callers stage the result and commit it once every guard of the
    /// surrounding operation has passed.
    pub fn next(&self, transition: Transition) -> Option<Player> {
        if transition.requires_eligibility() && !self.eligible {
            return None;
        }
        let state = self.state.target(transition)?;
        let mut next = self.clone();
        next.state = state;
        match transition {
            Transition::Exclude => next.exclusion_count += 1,
            Transition::Eject => next.eligible = false,
            _ => {}
        }
        Some(next)
    }

    /// Bench reset used when (re)registering starters.
    pub fn reset_to_bench(&mut self) {
        self.state = PlayerState::Bench;
        self.eligible = true;
    }
}
