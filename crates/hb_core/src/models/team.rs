//! Team identity and per-team containers.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

// ============================================================================
// TeamSide
// ============================================================================

/// One of the two teams of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum TeamSide {
    #[default]
    A,
    B,
}

impl TeamSide {
    pub const ALL: [TeamSide; 2] = [TeamSide::A, TeamSide::B];

    /// Name used until the team is given one.
    pub fn default_name(&self) -> String {
        format!("Team {}", self)
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamSide::A => write!(f, "A"),
            TeamSide::B => write!(f, "B"),
        }
    }
}

// ============================================================================
// Teams<T> - one value per side
// ============================================================================

/// A value held once per team, indexable by [`TeamSide`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Teams<T> {
    pub a: T,
    pub b: T,
}

impl<T> Teams<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamSide, &T)> {
        [(TeamSide::A, &self.a), (TeamSide::B, &self.b)].into_iter()
    }
}

impl<T> Index<TeamSide> for Teams<T> {
    type Output = T;

    fn index(&self, side: TeamSide) -> &T {
        match side {
            TeamSide::A => &self.a,
            TeamSide::B => &self.b,
        }
    }
}

impl<T> IndexMut<TeamSide> for Teams<T> {
    fn index_mut(&mut self, side: TeamSide) -> &mut T {
        match side {
            TeamSide::A => &mut self.a,
            TeamSide::B => &mut self.b,
        }
    }
}

// ============================================================================
// Half
// ============================================================================

/// Match period used to pick the played-time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    #[default]
    First,
    Second,
}

impl TryFrom<u8> for Half {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Half::First),
            2 => Ok(Half::Second),
            other => Err(other),
        }
    }
}
