//! Time Ledger - per-player time in each state, in seconds.
//!
//! Buckets only ever grow through accrual; retroactive corrections move time
//! between buckets and clamp at zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Half, PlayerState, TeamSide, Teams};
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub played_first_half: f64,
    pub played_second_half: f64,
    pub bench: f64,
    pub penalty: f64,
}

impl LedgerEntry {
    pub fn played(&self, half: Half) -> f64 {
        match half {
            Half::First => self.played_first_half,
            Half::Second => self.played_second_half,
        }
    }

    pub fn played_mut(&mut self, half: Half) -> &mut f64 {
        match half {
            Half::First => &mut self.played_first_half,
            Half::Second => &mut self.played_second_half,
        }
    }

    pub fn played_total(&self) -> f64 {
        self.played_first_half + self.played_second_half
    }

    /// Sum of all four buckets.
    pub fn total(&self) -> f64 {
        self.played_total() + self.bench + self.penalty
    }

    /// Moves `dt` from played[half] to bench.
    pub fn shift_played_to_bench(&mut self, half: Half, dt: f64) {
        let played = self.played_mut(half);
        *played = (*played - dt).max(0.0);
        self.bench += dt;
    }

    /// Moves `dt` from bench to played[half].
    pub fn shift_bench_to_played(&mut self, half: Half, dt: f64) {
        self.bench = (self.bench - dt).max(0.0);
        *self.played_mut(half) += dt;
    }
}

pub type LedgerSnapshot = Teams<BTreeMap<u32, LedgerEntry>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeLedger {
    entries: LedgerSnapshot,
}

impl TimeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh zeroed entries for `numbers`, replacing whatever the team had.
    pub fn reset_team(&mut self, team: TeamSide, numbers: impl IntoIterator<Item = u32>) {
        self.entries[team] = numbers.into_iter().map(|n| (n, LedgerEntry::default())).collect();
    }

    pub fn entry(&self, team: TeamSide, number: u32) -> LedgerEntry {
        self.entries[team].get(&number).copied().unwrap_or_default()
    }

    pub(crate) fn entry_mut(&mut self, team: TeamSide, number: u32) -> &mut LedgerEntry {
        self.entries[team].entry(number).or_default()
    }

    pub(crate) fn set_entry(&mut self, team: TeamSide, number: u32, entry: LedgerEntry) {
        self.entries[team].insert(number, entry);
    }

    /// Adds `dt` to each rostered player's bucket for their current state.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn accrue(&mut self, roster: &Roster, dt: f64, half: Half) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        for (team, player) in roster.players() {
            let entry = self.entry_mut(team, player.number);
            match player.state {
                PlayerState::Playing => *entry.played_mut(half) += dt,
                PlayerState::Bench => entry.bench += dt,
                PlayerState::Excluded => entry.penalty += dt,
                PlayerState::Ejected => {}
            }
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.entries.clone()
    }
}
