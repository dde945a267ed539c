//! # Match Configuration
//!
//! Exclusion rules that differ between competitions, kept in one place.
//!
//! ## Usage
//! ```rust
//! use hb_core::config::MatchConfig;
//!
//! let config = MatchConfig::default();
//! let manual = MatchConfig::manual_escalation();
//! assert_eq!(config.exclusion_duration_seconds, 120.0);
//! assert_eq!(manual.exclusions_before_ejection, 0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Default length of a timed exclusion (2 minutes)
pub const DEFAULT_EXCLUSION_SECONDS: f64 = 120.0;

/// Exclusions that lead to an automatic ejection by default
pub const DEFAULT_EXCLUSIONS_BEFORE_EJECTION: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Length of each timed exclusion in logical seconds (default: 120.0)
    pub exclusion_duration_seconds: f64,
    /// Exclusion count that forces an ejection; 0 disables (default: 3)
    pub exclusions_before_ejection: u32,
    /// Whether a red card also registers a team penalty (default: true)
    pub ejection_registers_team_penalty: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            exclusion_duration_seconds: DEFAULT_EXCLUSION_SECONDS,
            exclusions_before_ejection: DEFAULT_EXCLUSIONS_BEFORE_EJECTION,
            ejection_registers_team_penalty: true,
        }
    }
}

impl MatchConfig {
    /// Third exclusion ejects, red cards leave the team short-handed.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Officials record every ejection by hand and red cards carry no team penalty.
    pub fn manual_escalation() -> Self {
        Self {
            exclusions_before_ejection: 0,
            ejection_registers_team_penalty: false,
            ..Self::default()
        }
    }

    pub fn auto_ejection_enabled(&self) -> bool {
        self.exclusions_before_ejection > 0
    }

    pub fn validate(&self) -> Result<()> {
        let d = self.exclusion_duration_seconds;
        if !d.is_finite() || d <= 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "exclusion_duration_seconds must be a positive number, got {}",
                d
            )));
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: MatchConfig =
            serde_yaml::from_str(yaml).map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| MatchError::InvalidConfig(e.to_string()))
    }
}
