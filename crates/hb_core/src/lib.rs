//! # hb_core - Handball Match State Engine
//!
//! Tracks the state of a live handball match for a bench official:
//! - Pausable match clock driven by a pull-based wall clock
//! - Per-team rosters with a player state machine (bench, playing, excluded, ejected)
//! - Timed 2-minute exclusions with team-level return slots
//! - Live and retroactive substitutions
//! - Per-player time ledger (played by half, bench, penalty)
//!
//! Every mutation goes through [`Match`] and either applies fully or fails
//! with a [`MatchError`] leaving the state untouched.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod penalty;
pub mod roster;
pub mod shared;

pub use clock::{format_mmss, parse_mmss, ManualWallClock, MatchClock, SystemWallClock, WallClock};
pub use config::MatchConfig;
pub use engine::{
    EjectionOutcome, ExclusionOutcome, Match, MatchCommand, ReturnOutcome, TimeMark,
};
pub use error::{ErrorKind, MarkIssue, MatchError, Result};
pub use export::{export_rows, write_csv, ExportRow};
pub use ledger::{LedgerEntry, LedgerSnapshot, TimeLedger};
pub use models::{EventKind, Half, MatchEvent, Player, PlayerState, TeamSide, Teams, Transition};
pub use penalty::{Penalty, PenaltyId, PenaltyTracker};
pub use roster::{PlayerSnapshot, Roster, RosterSnapshot, TeamRoster};
pub use shared::SharedMatch;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_period_through_public_api() {
        let wall = ManualWallClock::new();
        let mut m = Match::with_clock(MatchConfig::standard(), wall.clone()).unwrap();
        m.save_team(TeamSide::A, Some("Home"), None, &[1, 2, 3, 4]).unwrap();
        m.save_team(TeamSide::B, Some("Away"), None, &[10, 11, 12]).unwrap();
        m.register_starters(TeamSide::A, &[1, 2, 3]).unwrap();
        m.register_starters(TeamSide::B, &[10, 11]).unwrap();

        m.start_clock();
        wall.advance_secs(200.0);
        m.tick();
        m.exclude_now(TeamSide::B, 11).unwrap();
        assert_eq!(m.open_slots(TeamSide::B), 0);

        wall.advance_secs(120.0);
        m.tick();
        assert_eq!(m.open_slots(TeamSide::B), 1);
        let err = m.confirm_return(TeamSide::A, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoExpiredPenalty);

        m.confirm_return(TeamSide::B, 12).unwrap();
        assert_eq!(m.open_slots(TeamSide::B), 0);
        assert_eq!(format_mmss(m.elapsed()), "05:20");

        let rows = export_rows(&m);
        assert_eq!(rows.len(), 7);
        let b11 = rows.iter().find(|r| r.team == TeamSide::B && r.number == 11).unwrap();
        assert_eq!(b11.state, PlayerState::Excluded);
        assert_eq!(b11.penalty_minutes, 2.0);
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
