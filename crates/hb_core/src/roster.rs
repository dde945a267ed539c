//! Roster - owns every player record of both teams.
//!
//! Players are keyed by shirt number, so snapshots come out ordered.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::models::{Player, PlayerState, TeamSide, Teams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub name: String,
    /// Opaque to the engine
    pub color: Option<String>,
    pub players: BTreeMap<u32, Player>,
    /// Set by starter registration, cleared to allow a correction.
    pub starters_registered: bool,
}

impl TeamRoster {
    pub fn empty(side: TeamSide) -> Self {
        Self {
            name: side.default_name(),
            color: None,
            players: BTreeMap::new(),
            starters_registered: false,
        }
    }

    pub fn numbers_in(&self, state: PlayerState) -> Vec<u32> {
        self.players
            .values()
            .filter(|p| p.state == state)
            .map(|p| p.number)
            .collect()
    }
}

/// Read-only view of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub number: u32,
    pub state: PlayerState,
    pub eligible: bool,
    pub exclusion_count: u32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            number: p.number,
            state: p.state,
            eligible: p.eligible,
            exclusion_count: p.exclusion_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub a: Vec<PlayerSnapshot>,
    pub b: Vec<PlayerSnapshot>,
}

impl RosterSnapshot {
    pub fn team(&self, side: TeamSide) -> &[PlayerSnapshot] {
        match side {
            TeamSide::A => &self.a,
            TeamSide::B => &self.b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    teams: Teams<TeamRoster>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            teams: Teams::new(TeamRoster::empty(TeamSide::A), TeamRoster::empty(TeamSide::B)),
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamRoster {
        &self.teams[side]
    }

    /// Builds a fresh team roster; duplicate or zero shirt numbers are rejected.
    pub fn build_team(
        side: TeamSide,
        name: Option<&str>,
        color: Option<&str>,
        numbers: &[u32],
    ) -> Result<TeamRoster> {
        let mut players = BTreeMap::new();
        for &number in numbers {
            if number == 0 {
                return Err(MatchError::InvalidPlayerNumber { team: side, number });
            }
            if players.insert(number, Player::new(number)).is_some() {
                return Err(MatchError::DuplicatePlayer { team: side, number });
            }
        }
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => side.default_name(),
        };
        Ok(TeamRoster {
            name,
            color: color.map(str::to_string),
            players,
            starters_registered: false,
        })
    }

    pub fn replace_team(&mut self, side: TeamSide, roster: TeamRoster) {
        self.teams[side] = roster;
    }

    pub fn player(&self, side: TeamSide, number: u32) -> Result<&Player> {
        self.teams[side]
            .players
            .get(&number)
            .ok_or(MatchError::UnknownPlayer { team: side, number })
    }

    /// Commits a player previously staged with [`Player::next`].
    pub(crate) fn commit(&mut self, side: TeamSide, player: Player) {
        self.teams[side].players.insert(player.number, player);
    }

    /// Validates a starting lineup without touching the roster.
    pub fn check_starters(&self, side: TeamSide, starters: &[u32]) -> Result<BTreeSet<u32>> {
        if starters.is_empty() {
            return Err(MatchError::EmptyLineup { team: side });
        }
        let selected: BTreeSet<u32> = starters.iter().copied().collect();
        for &number in &selected {
            self.player(side, number)?;
        }
        Ok(selected)
    }

    /// Forces everyone to `Bench`/eligible, then moves `starters` on court.
    pub fn register_starters(&mut self, side: TeamSide, starters: &[u32]) -> Result<()> {
        let selected = self.check_starters(side, starters)?;

        let team = &mut self.teams[side];
        for player in team.players.values_mut() {
            player.reset_to_bench();
            if selected.contains(&player.number) {
                player.state = PlayerState::Playing;
            }
        }
        team.starters_registered = true;
        Ok(())
    }

    /// Labels a player's court position; `None` clears it. Survives starter
    /// re-registration, not a roster save.
    pub fn set_position(&mut self, side: TeamSide, number: u32, position: Option<String>) -> Result<()> {
        let player = self.teams[side]
            .players
            .get_mut(&number)
            .ok_or(MatchError::UnknownPlayer { team: side, number })?;
        player.position = position;
        Ok(())
    }

    pub fn reopen_starters(&mut self, side: TeamSide) {
        self.teams[side].starters_registered = false;
    }

    pub fn players(&self) -> impl Iterator<Item = (TeamSide, &Player)> {
        TeamSide::ALL
            .into_iter()
            .flat_map(move |side| self.teams[side].players.values().map(move |p| (side, p)))
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        let view = |side: TeamSide| -> Vec<PlayerSnapshot> {
            self.teams[side].players.values().map(PlayerSnapshot::from).collect()
        };
        RosterSnapshot {
            a: view(TeamSide::A),
            b: view(TeamSide::B),
        }
    }
}
