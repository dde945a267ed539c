//! Penalty Tracker - timed exclusions per team.
//!
//! Penalties are append-only: the only mutation is `consumed` flipping to
//! true once, when a return fills the slot the penalty opened. Expired and
//! consumed penalties stay around so served time can be reconstructed.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::models::{TeamSide, Teams};

/// Identifies a penalty within the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyId {
    pub team: TeamSide,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub team: TeamSide,
    pub player_number: u32,
    pub start_elapsed: f64,
    pub end_elapsed: f64,
    pub consumed: bool,
}

impl Penalty {
    pub fn is_active(&self, at: f64) -> bool {
        at < self.end_elapsed && !self.consumed
    }

    pub fn is_expired_unconsumed(&self, at: f64) -> bool {
        at >= self.end_elapsed && !self.consumed
    }

    /// Seconds of this penalty served by `at`.
    pub fn served(&self, at: f64) -> f64 {
        (at.min(self.end_elapsed) - self.start_elapsed).max(0.0)
    }

    /// Seconds left at `at`, for countdown displays.
    pub fn remaining(&self, at: f64) -> f64 {
        (self.end_elapsed - at).max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenaltyTracker {
    penalties: Teams<Vec<Penalty>>,
}

impl PenaltyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a penalty running from `start` to `start + duration`.
    pub fn register(&mut self, team: TeamSide, number: u32, start: f64, duration: f64) -> PenaltyId {
        let list = &mut self.penalties[team];
        list.push(Penalty {
            team,
            player_number: number,
            start_elapsed: start,
            end_elapsed: start + duration,
            consumed: false,
        });
        PenaltyId { team, index: list.len() - 1 }
    }

    pub fn get(&self, id: PenaltyId) -> Option<&Penalty> {
        self.penalties[id.team].get(id.index)
    }

    pub fn all(&self, team: TeamSide) -> &[Penalty] {
        &self.penalties[team]
    }

    /// Penalties still running at `at`. Display only.
    pub fn active(&self, team: TeamSide, at: f64) -> Vec<&Penalty> {
        self.penalties[team].iter().filter(|p| p.is_active(at)).collect()
    }

    /// Expired, unconsumed penalties at `at`, earliest `end` first.
    pub fn expired_unconsumed(&self, team: TeamSide, at: f64) -> Vec<(PenaltyId, &Penalty)> {
        let mut expired: Vec<(PenaltyId, &Penalty)> = self.penalties[team]
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_expired_unconsumed(at))
            .map(|(index, p)| (PenaltyId { team, index }, p))
            .collect();
        // stable: equal ends keep registration order
        expired.sort_by(|(_, x), (_, y)| x.end_elapsed.total_cmp(&y.end_elapsed));
        expired
    }

    /// Slots the team may fill with a returning player.
    pub fn open_slots(&self, team: TeamSide, at: f64) -> usize {
        self.penalties[team].iter().filter(|p| p.is_expired_unconsumed(at)).count()
    }

    /// Marks a penalty as used by a return. Ids come from [`register`](Self::register).
    pub fn consume(&mut self, id: PenaltyId) -> Result<()> {
        let penalty = self.penalties[id.team]
            .get_mut(id.index)
            .ok_or(MatchError::UnknownPenalty { team: id.team, index: id.index })?;
        if penalty.consumed {
            return Err(MatchError::AlreadyConsumed { team: id.team, index: id.index });
        }
        penalty.consumed = true;
        Ok(())
    }

    /// Authoritative served seconds for one player up to `at`.
    pub fn seconds_served(&self, team: TeamSide, number: u32, at: f64) -> f64 {
        self.penalties[team]
            .iter()
            .filter(|p| p.player_number == number)
            .map(|p| p.served(at))
            .sum()
    }

    pub fn clear_team(&mut self, team: TeamSide) {
        self.penalties[team].clear();
    }
}
