//! Serializable actions for script-driven callers.

use serde::{Deserialize, Serialize};

use super::Match;
use crate::clock::{parse_mmss, WallClock};
use crate::error::{MarkIssue, MatchError, Result};
use crate::models::{Half, TeamSide};

/// Logical match time given either as seconds or as `mm:ss`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeMark {
    Seconds(f64),
    Clock(String),
}

impl TimeMark {
    pub fn seconds(&self) -> Option<f64> {
        match self {
            TimeMark::Seconds(s) => Some(*s),
            TimeMark::Clock(text) => parse_mmss(text).map(f64::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MatchCommand {
    SaveTeam {
        team: TeamSide,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        color: Option<String>,
        numbers: Vec<u32>,
    },
    RegisterStarters {
        team: TeamSide,
        starters: Vec<u32>,
    },
    ReopenStarters {
        team: TeamSide,
    },
    SetPosition {
        team: TeamSide,
        number: u32,
        #[serde(default)]
        position: Option<String>,
    },
    Start,
    Pause,
    Reset,
    SetHalf {
        half: Half,
    },
    Substitute {
        team: TeamSide,
        out: u32,
        incoming: u32,
    },
    Exclude {
        team: TeamSide,
        number: u32,
    },
    ConfirmReturn {
        team: TeamSide,
        number: u32,
    },
    Eject {
        team: TeamSide,
        number: u32,
    },
    RetroactiveSubstitute {
        team: TeamSide,
        out: u32,
        incoming: u32,
        mark: TimeMark,
        #[serde(default)]
        half: Half,
    },
}

impl<C: WallClock> Match<C> {
    /// Dispatches `command` to the matching method.
    pub fn apply(&mut self, command: &MatchCommand) -> Result<()> {
        match command {
            MatchCommand::SaveTeam { team, name, color, numbers } => {
                self.save_team(*team, name.as_deref(), color.as_deref(), numbers)
            }
            MatchCommand::RegisterStarters { team, starters } => self.register_starters(*team, starters),
            MatchCommand::SetPosition { team, number, position } => {
                self.set_position(*team, *number, position.as_deref())
            }
            MatchCommand::ReopenStarters { team } => {
                self.reopen_starters(*team);
                Ok(())
            }
            MatchCommand::Start => {
                self.start_clock();
                Ok(())
            }
            MatchCommand::Pause => {
                self.pause_clock();
                Ok(())
            }
            MatchCommand::Reset => {
                self.reset_clock();
                Ok(())
            }
            MatchCommand::SetHalf { half } => {
                self.set_half(*half);
                Ok(())
            }
            MatchCommand::Substitute { team, out, incoming } => self.substitute_live(*team, *out, *incoming),
            MatchCommand::Exclude { team, number } => self.exclude_now(*team, *number).map(|_| ()),
            MatchCommand::ConfirmReturn { team, number } => self.confirm_return(*team, *number).map(|_| ()),
            MatchCommand::Eject { team, number } => self.eject(*team, *number).map(|_| ()),
            MatchCommand::RetroactiveSubstitute { team, out, incoming, mark, half } => {
                let seconds = mark.seconds().ok_or(MatchError::InvalidMark {
                    mark: f64::NAN,
                    now: self.elapsed(),
                    issue: MarkIssue::Unparsable,
                })?;
                self.retroactive_substitute(*team, *out, *incoming, seconds, *half)
            }
        }
    }
}
