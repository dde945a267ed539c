pub mod events;
pub mod player;
pub mod team;

pub use events::{EventKind, MatchEvent};
pub use player::{Player, PlayerState, Transition};
pub use team::{Half, TeamSide, Teams};
