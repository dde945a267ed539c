//! Match aggregate - the only writer of roster, penalties and ledger.
//!
//! `Match` owns every component exclusively. Each mutating method evaluates
//! all of its guards against the current state, stages the resulting records,
//! and only then commits them, so a failed call leaves nothing changed.
//!
//! Action methods are split by concern:
//! - `substitutions.rs`: live and retroactive substitutions
//! - `exclusions.rs`: timed exclusions, returns, ejections
//! - `commands.rs`: serde command dispatch for script drivers

mod commands;
mod exclusions;
mod substitutions;


pub use commands::{MatchCommand, TimeMark};
pub use exclusions::{EjectionOutcome, ExclusionOutcome, ReturnOutcome};

use crate::clock::{MatchClock, SystemWallClock, WallClock};
use crate::config::MatchConfig;
use crate::error::Result;
use crate::ledger::{LedgerSnapshot, TimeLedger};
use crate::models::{EventKind, Half, MatchEvent, TeamSide};
use crate::penalty::{Penalty, PenaltyId, PenaltyTracker};
use crate::roster::{Roster, RosterSnapshot};

#[derive(Debug)]
pub struct Match<C: WallClock = SystemWallClock> {
    config: MatchConfig,
    clock: MatchClock<C>,
    roster: Roster,
    penalties: PenaltyTracker,
    ledger: TimeLedger,
    half: Half,
    /// Logical elapsed time already credited to the ledger by `tick`
    last_tick_elapsed: f64,
    events: Vec<MatchEvent>,
}

impl Match<SystemWallClock> {
    pub fn new(config: MatchConfig) -> Result<Self> {
        Self::with_clock(config, SystemWallClock)
    }
}

impl<C: WallClock> Match<C> {
    pub fn with_clock(config: MatchConfig, source: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: MatchClock::new(source),
            roster: Roster::new(),
            penalties: PenaltyTracker::new(),
            ledger: TimeLedger::new(),
            half: Half::First,
            last_tick_elapsed: 0.0,
            events: Vec::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn clock(&self) -> &MatchClock<C> {
        &self.clock
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn penalties(&self) -> &PenaltyTracker {
        &self.penalties
    }

    pub fn ledger(&self) -> &TimeLedger {
        &self.ledger
    }

    pub fn half(&self) -> Half {
        self.half
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    // =========================================================================
    // Clock
    // =========================================================================

    pub fn start_clock(&mut self) {
        if self.clock.is_running() {
            return;
        }
        self.clock.start();
        log::info!("Clock started at {:.1}s", self.elapsed());
        self.emit(None, EventKind::ClockStarted);
    }

    pub fn pause_clock(&mut self) {
        if !self.clock.is_running() {
            return;
        }
        self.tick();
        self.clock.pause();
        log::info!("Clock paused at {:.1}s", self.elapsed());
        self.emit(None, EventKind::ClockPaused);
    }

    /// Resets the clock to zero. Time up to the reset is credited first, then
    /// the tick cursor follows the clock back to zero.
    pub fn reset_clock(&mut self) {
        self.tick();
        self.clock.reset();
        self.last_tick_elapsed = 0.0;
        log::info!("Clock reset");
        self.emit(None, EventKind::ClockReset);
    }

    pub fn set_half(&mut self, half: Half) {
        if self.half == half {
            return;
        }
        // time so far belongs to the outgoing half
        self.tick();
        self.half = half;
        self.emit(None, EventKind::HalfChanged { half });
    }

    // =========================================================================
    // Roster lifecycle
    // =========================================================================

    /// Replaces a team's roster. The team's penalties and ledger are reset
    /// together with it; time up to now is credited to the outgoing roster.
    pub fn save_team(
        &mut self,
        team: TeamSide,
        name: Option<&str>,
        color: Option<&str>,
        numbers: &[u32],
    ) -> Result<()> {
        let roster = Roster::build_team(team, name, color, numbers)?;
        let count = roster.players.len();
        self.tick();

        self.ledger.reset_team(team, roster.players.keys().copied());
        self.penalties.clear_team(team);
        self.roster.replace_team(team, roster);

        log::info!("Team {} saved with {} players", team, count);
        self.emit(Some(team), EventKind::TeamSaved { players: count });
        Ok(())
    }

    /// Caller is expected to gate re-registration once the match is underway.
    pub fn register_starters(&mut self, team: TeamSide, starters: &[u32]) -> Result<()> {
        self.roster.check_starters(team, starters)?;
        self.tick();
        self.roster.register_starters(team, starters)?;
        let mut starters = starters.to_vec();
        starters.sort_unstable();
        starters.dedup();
        log::debug!("Team {} starters: {:?}", team, starters);
        self.emit(Some(team), EventKind::StartersRegistered { starters });
        Ok(())
    }

    pub fn set_position(&mut self, team: TeamSide, number: u32, position: Option<&str>) -> Result<()> {
        let position = position.map(str::trim).filter(|p| !p.is_empty()).map(str::to_string);
        self.roster.set_position(team, number, position.clone())?;
        self.emit(Some(team), EventKind::PositionSet { number, position });
        Ok(())
    }

    pub fn reopen_starters(&mut self, team: TeamSide) {
        self.roster.reopen_starters(team);
        self.emit(Some(team), EventKind::StartersReopened);
    }

    // =========================================================================
    // Time accounting
    // =========================================================================

    /// Credits `dt` seconds to every player's bucket for their current state.
    pub fn accrue(&mut self, dt: f64, half: Half) {
        self.ledger.accrue(&self.roster, dt, half);
    }

    /// Credits the logical time elapsed since the previous tick, using the
    /// current half. Returns the seconds credited.
    ///
    /// Every mutator ticks once its checks pass, before it changes state,
    /// so callers only need to tick for display refreshes.
    pub fn tick(&mut self) -> f64 {
        let now = self.elapsed();
        let dt = now - self.last_tick_elapsed;
        self.last_tick_elapsed = now;
        if dt <= 0.0 {
            return 0.0;
        }
        self.ledger.accrue(&self.roster, dt, self.half);
        log::trace!("Tick credited {:.3}s at {:.1}s", dt, now);
        dt
    }

    pub fn penalty_seconds_served(&self, team: TeamSide, number: u32, at: f64) -> f64 {
        self.penalties.seconds_served(team, number, at)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn active(&self, team: TeamSide, at: f64) -> Vec<&Penalty> {
        self.penalties.active(team, at)
    }

    pub fn expired_unconsumed(&self, team: TeamSide, at: f64) -> Vec<(PenaltyId, &Penalty)> {
        self.penalties.expired_unconsumed(team, at)
    }

    pub fn open_slots(&self, team: TeamSide) -> usize {
        self.penalties.open_slots(team, self.elapsed())
    }

    pub fn roster_snapshot(&self) -> RosterSnapshot {
        self.roster.snapshot()
    }

    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    fn emit(&mut self, team: Option<TeamSide>, kind: EventKind) {
        let elapsed = self.elapsed();
        self.events.push(MatchEvent::new(elapsed, team, kind));
    }
}
