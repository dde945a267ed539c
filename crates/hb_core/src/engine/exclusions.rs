//! Timed exclusions, returns and ejections.
//!
//! A return is a team-level slot: any expired, unconsumed penalty of the team
//! lets one eligible Bench or Excluded player back on court, not necessarily
//! the player who was excluded. The earliest-expiring penalty is used first.

use serde::{Deserialize, Serialize};

use super::Match;
use crate::clock::WallClock;
use crate::error::{MatchError, Result};
use crate::models::{EventKind, Player, TeamSide, Transition};
use crate::penalty::PenaltyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionOutcome {
    pub penalty: PenaltyId,
    /// Exclusion count reached the configured limit
    pub auto_ejected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnOutcome {
    pub consumed: PenaltyId,
    /// Player whose penalty opened the slot
    pub slot_of: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EjectionOutcome {
    pub team_penalty: Option<PenaltyId>,
}

fn invalid_transition(team: TeamSide, player: &Player, transition: Transition) -> MatchError {
    MatchError::InvalidTransition {
        team,
        number: player.number,
        from: player.state,
        transition,
    }
}

impl<C: WallClock> Match<C> {
    /// Excludes a Playing, eligible player with a penalty starting at `at`.
    pub fn apply_exclusion(&mut self, team: TeamSide, number: u32, at: f64) -> Result<ExclusionOutcome> {
        let player = self.roster.player(team, number)?;
        let mut next = player
            .next(Transition::Exclude)
            .ok_or_else(|| invalid_transition(team, player, Transition::Exclude))?;

        let limit = self.config.exclusions_before_ejection;
        let auto_ejected = self.config.auto_ejection_enabled() && next.exclusion_count >= limit;
        if auto_ejected {
            if let Some(ejected) = next.next(Transition::Eject) {
                next = ejected;
            }
        }

        self.tick();
        let duration = self.config.exclusion_duration_seconds;
        let penalty = self.penalties.register(team, number, at, duration);
        self.roster.commit(team, next);

        if auto_ejected {
            log::info!("Team {} #{} ejected after {} exclusions", team, number, limit);
        } else {
            log::debug!("Team {} #{} excluded at {:.1}s", team, number, at);
        }
        self.emit(
            Some(team),
            EventKind::Exclusion { number, penalty_index: penalty.index, auto_ejected },
        );
        Ok(ExclusionOutcome { penalty, auto_ejected })
    }

    /// [`apply_exclusion`](Self::apply_exclusion) at the current elapsed time.
    pub fn exclude_now(&mut self, team: TeamSide, number: u32) -> Result<ExclusionOutcome> {
        let at = self.elapsed();
        self.apply_exclusion(team, number, at)
    }

    /// Brings a Bench or Excluded player on court through an expired penalty.
    pub fn confirm_return(&mut self, team: TeamSide, number: u32) -> Result<ReturnOutcome> {
        let now = self.elapsed();
        let player = self.roster.player(team, number)?;
        let next = player
            .next(Transition::Return)
            .ok_or_else(|| invalid_transition(team, player, Transition::Return))?;

        let (consumed, slot_of) = self
            .penalties
            .expired_unconsumed(team, now)
            .first()
            .map(|(id, p)| (*id, p.player_number))
            .ok_or(MatchError::NoExpiredPenalty { team })?;

        self.tick();
        self.penalties.consume(consumed)?;
        self.roster.commit(team, next);

        log::debug!("Team {} #{} returned on slot of #{}", team, number, slot_of);
        self.emit(Some(team), EventKind::Return { number, slot_of });
        Ok(ReturnOutcome { consumed, slot_of })
    }

    /// Sends a player off for the rest of the match.
    pub fn eject(&mut self, team: TeamSide, number: u32) -> Result<EjectionOutcome> {
        let player = self.roster.player(team, number)?;
        let next = player
            .next(Transition::Eject)
            .ok_or_else(|| invalid_transition(team, player, Transition::Eject))?;

        self.tick();
        let team_penalty = if self.config.ejection_registers_team_penalty {
            let now = self.elapsed();
            let duration = self.config.exclusion_duration_seconds;
            Some(self.penalties.register(team, number, now, duration))
        } else {
            None
        };
        self.roster.commit(team, next);

        log::info!("Team {} #{} ejected", team, number);
        self.emit(
            Some(team),
            EventKind::Ejection { number, team_penalty: team_penalty.is_some() },
        );
        Ok(EjectionOutcome { team_penalty })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run, setup};
    use crate::config::MatchConfig;
    use crate::error::{ErrorKind, MatchError};
    use crate::models::{PlayerState, TeamSide, Transition};

    #[test]
    fn exclusion_window_scenario() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 125.0);

        let start = m.elapsed();
        let outcome = m.apply_exclusion(TeamSide::A, 7, start).unwrap();
        let penalty = m.penalties().get(outcome.penalty).unwrap().clone();
        assert_eq!(penalty.end_elapsed, start + 120.0);
        assert_eq!(m.roster().player(TeamSide::A, 7).unwrap().state, PlayerState::Excluded);

        let active: Vec<u32> = m.active(TeamSide::A, start + 119.0).iter().map(|p| p.player_number).collect();
        assert_eq!(active, vec![7]);
        assert!(m.expired_unconsumed(TeamSide::A, start + 119.0).is_empty());

        assert!(m.active(TeamSide::A, start + 120.0).is_empty());
        let expired = m.expired_unconsumed(TeamSide::A, start + 120.0);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].1.player_number, 7);
    }

    #[test]
    fn exclusion_requires_playing() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 10.0);
        m.exclude_now(TeamSide::A, 7).unwrap();
        m.eject(TeamSide::A, 9).unwrap();

        for number in [12, 7, 9] {
            let before = m.roster_snapshot();
            let penalties_before = m.penalties().clone();
            let err = m.exclude_now(TeamSide::A, number).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidTransition, "#{}", number);
            assert_eq!(m.roster_snapshot(), before);
            assert_eq!(*m.penalties(), penalties_before);
        }
    }

    #[test]
    fn three_exclusions_eject() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        for round in 1..=3 {
            run(&wall, &mut m, 10.0);
            let outcome = m.exclude_now(TeamSide::A, 7).unwrap();
            assert_eq!(outcome.auto_ejected, round == 3);
            if round < 3 {
                run(&wall, &mut m, 120.0);
                m.confirm_return(TeamSide::A, 7).unwrap();
            }
        }
        let p7 = m.roster().player(TeamSide::A, 7).unwrap();
        assert_eq!(p7.state, PlayerState::Ejected);
        assert!(!p7.eligible);
        assert_eq!(p7.exclusion_count, 3);
        // the third exclusion still leaves the team short-handed
        assert_eq!(m.active(TeamSide::A, m.elapsed()).len(), 1);
    }

    #[test]
    fn auto_ejection_disabled() {
        let (wall, mut m) = setup(MatchConfig::manual_escalation());
        m.start_clock();
        for _ in 0..4 {
            run(&wall, &mut m, 10.0);
            assert!(!m.exclude_now(TeamSide::A, 7).unwrap().auto_ejected);
            run(&wall, &mut m, 120.0);
            m.confirm_return(TeamSide::A, 7).unwrap();
        }
        let p7 = m.roster().player(TeamSide::A, 7).unwrap();
        assert_eq!(p7.state, PlayerState::Playing);
        assert_eq!(p7.exclusion_count, 4);
    }

    #[test]
    fn return_needs_expired_penalty() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 10.0);
        m.exclude_now(TeamSide::A, 7).unwrap();
        run(&wall, &mut m, 119.0);

        let err = m.confirm_return(TeamSide::A, 7).unwrap_err();
        assert_eq!(err, MatchError::NoExpiredPenalty { team: TeamSide::A });
        assert_eq!(m.roster().player(TeamSide::A, 7).unwrap().state, PlayerState::Excluded);

        run(&wall, &mut m, 1.0);
        let outcome = m.confirm_return(TeamSide::A, 7).unwrap();
        assert_eq!(outcome.slot_of, 7);
        assert!(m.penalties().get(outcome.consumed).unwrap().consumed);
        assert_eq!(m.roster().player(TeamSide::A, 7).unwrap().state, PlayerState::Playing);

        // slot already used
        let err = m.confirm_return(TeamSide::A, 12).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoExpiredPenalty);
    }

    #[test]
    fn return_fills_team_slot_with_bench_player() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 10.0);
        m.exclude_now(TeamSide::A, 7).unwrap();
        run(&wall, &mut m, 5.0);
        m.exclude_now(TeamSide::A, 9).unwrap();
        run(&wall, &mut m, 200.0);
        assert_eq!(m.open_slots(TeamSide::A), 2);

        let outcome = m.confirm_return(TeamSide::A, 12).unwrap();
        assert_eq!(outcome.slot_of, 7);
        assert_eq!(m.open_slots(TeamSide::A), 1);
        assert_eq!(m.roster().player(TeamSide::A, 12).unwrap().state, PlayerState::Playing);
        assert_eq!(m.roster().player(TeamSide::A, 7).unwrap().state, PlayerState::Excluded);

        let outcome = m.confirm_return(TeamSide::A, 7).unwrap();
        assert_eq!(outcome.slot_of, 9);
        assert_eq!(m.open_slots(TeamSide::A), 0);
    }

    #[test]
    fn return_rejects_playing_player() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 10.0);
        m.exclude_now(TeamSide::A, 7).unwrap();
        run(&wall, &mut m, 130.0);

        let err = m.confirm_return(TeamSide::A, 1).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidTransition { from: PlayerState::Playing, transition: Transition::Return, .. }
        ));
        assert_eq!(m.open_slots(TeamSide::A), 1);
    }

    #[test]
    fn ejection_registers_team_penalty_by_default() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 30.0);
        let outcome = m.eject(TeamSide::B, 5).unwrap();
        let id = outcome.team_penalty.unwrap();
        assert_eq!(m.penalties().get(id).unwrap().player_number, 5);

        let p5 = m.roster().player(TeamSide::B, 5).unwrap();
        assert_eq!(p5.state, PlayerState::Ejected);
        assert!(!p5.eligible);
        assert_eq!(p5.exclusion_count, 0);

        run(&wall, &mut m, 120.0);
        m.confirm_return(TeamSide::B, 8).unwrap();
        assert_eq!(m.roster().player(TeamSide::B, 8).unwrap().state, PlayerState::Playing);
    }

    #[test]
    fn ejection_without_team_penalty() {
        let (wall, mut m) = setup(MatchConfig::manual_escalation());
        m.start_clock();
        run(&wall, &mut m, 30.0);
        assert_eq!(m.eject(TeamSide::B, 5).unwrap().team_penalty, None);
        assert!(m.penalties().all(TeamSide::B).is_empty());
    }

    #[test]
    fn eject_from_excluded_but_not_bench() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 30.0);
        m.exclude_now(TeamSide::A, 7).unwrap();
        m.eject(TeamSide::A, 7).unwrap();
        assert_eq!(m.roster().player(TeamSide::A, 7).unwrap().state, PlayerState::Ejected);

        let err = m.eject(TeamSide::A, 12).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        let err = m.eject(TeamSide::A, 7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    }
}
