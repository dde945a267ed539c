use thiserror::Error;

use crate::models::{PlayerState, TeamSide, Transition};

/// Why a retroactive mark was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkIssue {
    /// The mark is not strictly before the current elapsed time.
    NotInPast,
    /// Outgoing and incoming player are the same.
    SamePlayer,
    /// The mark could not be read as a match time.
    Unparsable,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid transition for team {team} #{number}: {transition:?} not allowed from {from:?}")]
    InvalidTransition {
        team: TeamSide,
        number: u32,
        from: PlayerState,
        transition: Transition,
    },

    #[error("Illegal substitution for team {team}: out #{out} ({out_state:?}), in #{incoming} ({in_state:?})")]
    IllegalSubstitution {
        team: TeamSide,
        out: u32,
        incoming: u32,
        out_state: PlayerState,
        in_state: PlayerState,
    },

    #[error("No expired exclusion available for team {team}")]
    NoExpiredPenalty { team: TeamSide },

    #[error("Penalty {index} of team {team} was already consumed")]
    AlreadyConsumed { team: TeamSide, index: usize },

    #[error("Invalid retroactive mark {mark:.1}s at {now:.1}s: {issue:?}")]
    InvalidMark { mark: f64, now: f64, issue: MarkIssue },

    #[error("Unknown penalty {index} for team {team}")]
    UnknownPenalty { team: TeamSide, index: usize },

    #[error("Unknown player: team {team} #{number}")]
    UnknownPlayer { team: TeamSide, number: u32 },

    #[error("Duplicate shirt number #{number} for team {team}")]
    DuplicatePlayer { team: TeamSide, number: u32 },

    #[error("Invalid shirt number #{number} for team {team}")]
    InvalidPlayerNumber { team: TeamSide, number: u32 },

    #[error("Starting lineup for team {team} is empty")]
    EmptyLineup { team: TeamSide },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Machine-checkable discriminant of [`MatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidTransition,
    IllegalSubstitution,
    NoExpiredPenalty,
    AlreadyConsumed,
    UnknownPenalty,
    InvalidMark,
    UnknownPlayer,
    DuplicatePlayer,
    InvalidPlayerNumber,
    EmptyLineup,
    InvalidConfig,
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            MatchError::IllegalSubstitution { .. } => ErrorKind::IllegalSubstitution,
            MatchError::NoExpiredPenalty { .. } => ErrorKind::NoExpiredPenalty,
            MatchError::AlreadyConsumed { .. } => ErrorKind::AlreadyConsumed,
            MatchError::UnknownPenalty { .. } => ErrorKind::UnknownPenalty,
            MatchError::InvalidMark { .. } => ErrorKind::InvalidMark,
            MatchError::UnknownPlayer { .. } => ErrorKind::UnknownPlayer,
            MatchError::DuplicatePlayer { .. } => ErrorKind::DuplicatePlayer,
            MatchError::InvalidPlayerNumber { .. } => ErrorKind::InvalidPlayerNumber,
            MatchError::EmptyLineup { .. } => ErrorKind::EmptyLineup,
            MatchError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    /// Caller mistakes that can be retried with different input.
    ///
    /// `AlreadyConsumed` and `UnknownPenalty` signal engine misuse and are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MatchError::AlreadyConsumed { .. } | MatchError::UnknownPenalty { .. })
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
