//! Player Substitution Logic
//!
//! - `substitute_live`: Playing ↔ Bench swap, both or neither
//! - `retroactive_substitute`: same swap, with the ledger corrected as if it
//!   had happened at an earlier mark
//!
//! Retroactive corrections are best-effort: penalties that started or ended
//! inside `[mark, now]` are not revisited.

use super::Match;
use crate::clock::WallClock;
use crate::error::{MarkIssue, MatchError, Result};
use crate::models::{EventKind, Half, Player, TeamSide, Transition};

impl<C: WallClock> Match<C> {
    /// Swaps `out` (Playing) with `incoming` (Bench).
    pub fn substitute_live(&mut self, team: TeamSide, out: u32, incoming: u32) -> Result<()> {
        let (out_next, in_next) = self.stage_substitution(team, out, incoming)?;

        self.tick();
        self.roster.commit(team, out_next);
        self.roster.commit(team, in_next);

        log::debug!("Substitution team {}: out #{}, in #{}", team, out, incoming);
        self.emit(Some(team), EventKind::Substitution { out, incoming });
        Ok(())
    }

    /// Records a substitution that actually happened at `mark` seconds.
    ///
    /// Moves `now - mark` seconds from `out`'s played bucket for `half` to
    /// its bench bucket and from `incoming`'s bench to its played bucket
    /// (both clamped at zero), then swaps the two players like a live
    /// substitution.
    pub fn retroactive_substitute(
        &mut self,
        team: TeamSide,
        out: u32,
        incoming: u32,
        mark: f64,
        half: Half,
    ) -> Result<()> {
        let now = self.elapsed();
        if out == incoming {
            return Err(MatchError::InvalidMark { mark, now, issue: MarkIssue::SamePlayer });
        }
        self.roster.player(team, out)?;
        self.roster.player(team, incoming)?;

        let dt = now - mark;
        // NaN marks fail here too
        if !(dt > 0.0) {
            return Err(MatchError::InvalidMark { mark, now, issue: MarkIssue::NotInPast });
        }

        let (out_next, in_next) = self.stage_substitution(team, out, incoming)?;

        self.tick();
        let mut out_entry = self.ledger.entry(team, out);
        out_entry.shift_played_to_bench(half, dt);
        let mut in_entry = self.ledger.entry(team, incoming);
        in_entry.shift_bench_to_played(half, dt);

        self.ledger.set_entry(team, out, out_entry);
        self.ledger.set_entry(team, incoming, in_entry);
        self.roster.commit(team, out_next);
        self.roster.commit(team, in_next);

        log::debug!(
            "Retroactive substitution team {}: out #{}, in #{} from {:.1}s ({:.1}s moved)",
            team,
            out,
            incoming,
            mark,
            dt
        );
        self.emit(Some(team), EventKind::RetroactiveSubstitution { out, incoming, mark, half });
        Ok(())
    }

    /// Checks both sides of a swap and returns the players to commit.
    fn stage_substitution(&self, team: TeamSide, out: u32, incoming: u32) -> Result<(Player, Player)> {
        let out_player = self.roster.player(team, out)?;
        let in_player = self.roster.player(team, incoming)?;

        let illegal = || MatchError::IllegalSubstitution {
            team,
            out,
            incoming,
            out_state: out_player.state,
            in_state: in_player.state,
        };
        if out == incoming {
            return Err(illegal());
        }

        let out_next = out_player.next(Transition::SubstituteOut).ok_or_else(illegal)?;
        let in_next = in_player.next(Transition::SubstituteIn).ok_or_else(illegal)?;
        Ok((out_next, in_next))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run, setup};
    use crate::config::MatchConfig;
    use crate::error::{ErrorKind, MarkIssue, MatchError};
    use crate::models::{Half, PlayerState, TeamSide};

    const EPS: f64 = 1e-6;

    fn state(m: &super::Match<crate::clock::ManualWallClock>, team: TeamSide, n: u32) -> PlayerState {
        m.roster().player(team, n).unwrap().state
    }

    #[test]
    fn live_substitution_swaps_states() {
        let (_wall, mut m) = setup(MatchConfig::default());
        m.substitute_live(TeamSide::A, 7, 12).unwrap();
        assert_eq!(state(&m, TeamSide::A, 7), PlayerState::Bench);
        assert_eq!(state(&m, TeamSide::A, 12), PlayerState::Playing);
    }

    #[test]
    fn substitution_into_excluded_player_is_illegal() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 30.0);
        m.substitute_live(TeamSide::A, 9, 12).unwrap();
        m.apply_exclusion(TeamSide::A, 12, m.elapsed()).unwrap();
        assert_eq!(state(&m, TeamSide::A, 12), PlayerState::Excluded);

        let before = m.roster_snapshot();
        let err = m.substitute_live(TeamSide::A, 7, 12).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalSubstitution);
        assert_eq!(m.roster_snapshot(), before);
    }

    #[test]
    fn substitution_requires_playing_out_player() {
        let (_wall, mut m) = setup(MatchConfig::default());
        let err = m.substitute_live(TeamSide::A, 12, 20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalSubstitution);
        assert_eq!(state(&m, TeamSide::A, 20), PlayerState::Bench);
    }

    #[test]
    fn substitution_unknown_player() {
        let (_wall, mut m) = setup(MatchConfig::default());
        let err = m.substitute_live(TeamSide::A, 7, 99).unwrap_err();
        assert_eq!(err, MatchError::UnknownPlayer { team: TeamSide::A, number: 99 });
    }

    #[test]
    fn retroactive_moves_time_then_rejects_future_mark() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 360.0);

        m.retroactive_substitute(TeamSide::A, 7, 12, 300.0, Half::First).unwrap();

        let p7 = m.ledger().entry(TeamSide::A, 7);
        let p12 = m.ledger().entry(TeamSide::A, 12);
        assert!((p7.played_first_half - 300.0).abs() < EPS);
        assert!((p7.bench - 60.0).abs() < EPS);
        assert!((p12.bench - 300.0).abs() < EPS);
        assert!((p12.played_first_half - 60.0).abs() < EPS);
        assert_eq!(state(&m, TeamSide::A, 7), PlayerState::Bench);
        assert_eq!(state(&m, TeamSide::A, 12), PlayerState::Playing);

        let ledger_before = m.ledger_snapshot();
        let roster_before = m.roster_snapshot();
        let err = m.retroactive_substitute(TeamSide::A, 12, 7, 400.0, Half::First).unwrap_err();
        assert!(matches!(err, MatchError::InvalidMark { issue: MarkIssue::NotInPast, .. }));
        assert_eq!(m.ledger_snapshot(), ledger_before);
        assert_eq!(m.roster_snapshot(), roster_before);
    }

    #[test]
    fn retroactive_mark_equal_to_now_rejected() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 100.0);
        m.pause_clock();
        let err = m.retroactive_substitute(TeamSide::A, 7, 12, 100.0, Half::First).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMark);
    }

    #[test]
    fn retroactive_same_player_rejected() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 100.0);
        let err = m.retroactive_substitute(TeamSide::A, 7, 7, 10.0, Half::First).unwrap_err();
        assert!(matches!(err, MatchError::InvalidMark { issue: MarkIssue::SamePlayer, .. }));
    }

    #[test]
    fn retroactive_clamps_short_buckets() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 100.0);
        // 12 only has 100s of bench time; moving 100s from second-half play clamps at 0
        m.retroactive_substitute(TeamSide::A, 7, 12, 0.5, Half::Second).unwrap();
        let p7 = m.ledger().entry(TeamSide::A, 7);
        assert_eq!(p7.played_second_half, 0.0);
        assert!((p7.played_first_half - 100.0).abs() < EPS);
        assert!((p7.bench - 99.5).abs() < EPS);
        let p12 = m.ledger().entry(TeamSide::A, 12);
        assert!((p12.bench - 0.5).abs() < EPS);
        assert!((p12.played_second_half - 99.5).abs() < EPS);
    }

    #[test]
    fn retroactive_requires_live_swap_to_be_legal() {
        let (wall, mut m) = setup(MatchConfig::default());
        m.start_clock();
        run(&wall, &mut m, 100.0);
        let before = m.ledger_snapshot();
        let err = m.retroactive_substitute(TeamSide::A, 12, 20, 50.0, Half::First).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalSubstitution);
        assert_eq!(m.ledger_snapshot(), before);
    }
}
