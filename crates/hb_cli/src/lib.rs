//! Match Replay Library
//!
//! Replays a timed action script against a [`Match`] on a manual wall clock
//! and produces the time report.
//!
//! ```yaml
//! config:
//!   exclusions_before_ejection: 3
//! steps:
//!   - at: 0
//!     action: save_team
//!     team: A
//!     numbers: [1, 7, 9, 12]
//!   - at: 0
//!     action: start
//!   - at: 95.5
//!     action: exclude
//!     team: A
//!     number: 7
//! ```
//!
//! `at` is wall-clock seconds since the start of the replay. Pauses in the
//! script keep wall time running while the match clock stands still.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use hb_core::clock::MAX_MANUAL_OFFSET_SECS;
use hb_core::{
    export_rows, ExportRow, ManualWallClock, Match, MatchCommand, MatchConfig, MatchEvent, TeamSide,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Wall-clock seconds since the replay started
    pub at: f64,
    #[serde(flatten)]
    pub command: MatchCommand,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: Option<MatchConfig>,
    pub steps: Vec<Step>,
}

/// A step the engine rejected. The replay carries on after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFailure {
    pub step: usize,
    pub at: f64,
    pub kind: String,
    pub message: String,
}

/// Penalty still running when the replay ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyCountdown {
    pub team: TeamSide,
    pub number: u32,
    pub remaining_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub elapsed: f64,
    pub applied: usize,
    pub failures: Vec<StepFailure>,
    pub rows: Vec<ExportRow>,
    pub active_penalties: Vec<PenaltyCountdown>,
    pub events: Vec<MatchEvent>,
}

// ============================================================================
// Loading
// ============================================================================

pub fn parse_script(text: &str) -> Result<Script> {
    let script: Script = serde_yaml::from_str(text).context("Failed to parse replay script")?;
    let max_at = MAX_MANUAL_OFFSET_SECS as f64;
    for (index, step) in script.steps.iter().enumerate() {
        if !step.at.is_finite() || step.at < 0.0 || step.at > max_at {
            anyhow::bail!("Step {} time {} is outside 0..={}s", index, step.at, max_at);
        }
    }
    if let Some(config) = &script.config {
        config.validate().context("Invalid config in replay script")?;
    }
    Ok(script)
}

pub fn load_script(path: &Path) -> Result<Script> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    parse_script(&text).with_context(|| format!("In script {}", path.display()))
}

pub fn load_config(path: &Path) -> Result<MatchConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    MatchConfig::from_yaml_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
}

// ============================================================================
// Replay
// ============================================================================

/// Runs every step in order. `config` overrides the script's own config.
///
/// Steps dated before the previous one run at the previous step's time.
pub fn run_script(script: &Script, config: Option<MatchConfig>) -> Result<ReplayReport> {
    let config = config.or_else(|| script.config.clone()).unwrap_or_default();
    let wall = ManualWallClock::new();
    let mut m = Match::with_clock(config, wall.clone()).context("Failed to create match")?;

    let mut applied = 0;
    let mut failures = Vec::new();
    for (index, step) in script.steps.iter().enumerate() {
        if step.at < wall.offset_secs() {
            log::warn!("Step {} at {:.1}s is out of order; running it now", index, step.at);
        }
        wall.advance_to_secs(step.at);

        match m.apply(&step.command) {
            Ok(()) => applied += 1,
            Err(err) => {
                log::warn!("Step {} at {:.1}s rejected: {}", index, step.at, err);
                failures.push(StepFailure {
                    step: index,
                    at: step.at,
                    kind: format!("{:?}", err.kind()),
                    message: err.to_string(),
                });
            }
        }
    }
    m.tick();

    log::info!(
        "Replayed {} steps ({} rejected), match clock at {}",
        script.steps.len(),
        failures.len(),
        hb_core::format_mmss(m.elapsed())
    );

    let now = m.elapsed();
    let active_penalties = TeamSide::ALL
        .into_iter()
        .flat_map(|team| {
            m.active(team, now).into_iter().map(move |p| PenaltyCountdown {
                team,
                number: p.player_number,
                remaining_seconds: p.remaining(now),
            })
        })
        .collect();

    Ok(ReplayReport {
        elapsed: now,
        applied,
        failures,
        rows: export_rows(&m),
        active_penalties,
        events: m.events().to_vec(),
    })
}

// ============================================================================
// Output
// ============================================================================

pub fn report_csv(report: &ReplayReport) -> Result<String> {
    let mut buf = Vec::new();
    hb_core::write_csv(&report.rows, &mut buf).context("Failed to write CSV report")?;
    String::from_utf8(buf).context("CSV report is not UTF-8")
}

pub fn report_json(report: &ReplayReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

pub fn save_report(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write report: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::PlayerState;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCRIPT: &str = r#"
steps:
  - at: 0
    action: save_team
    team: A
    name: Lions
    numbers: [1, 7, 9, 12]
  - at: 0
    action: save_team
    team: B
    numbers: [4, 5]
  - at: 0
    action: register_starters
    team: A
    starters: [1, 7, 9]
  - at: 0
    action: register_starters
    team: B
    starters: [4]
  - at: 0
    action: start
  - at: 60
    action: exclude
    team: A
    number: 7
  - at: 100
    action: substitute
    team: A
    out: 7
    incoming: 12
  - at: 180
    action: confirm_return
    team: A
    number: 12
  - at: 240
    action: pause
"#;

    #[test]
    fn test_replay_applies_steps_and_records_failures() -> Result<()> {
        let script = parse_script(SCRIPT)?;
        let report = run_script(&script, None)?;

        assert_eq!(report.applied, 8);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].step, 6);
        assert_eq!(report.failures[0].kind, "IllegalSubstitution");
        assert!((report.elapsed - 240.0).abs() < 1e-6);

        let a12 = report.rows.iter().find(|r| r.team == TeamSide::A && r.number == 12).unwrap();
        assert_eq!(a12.state, PlayerState::Playing);
        assert_eq!(a12.bench_minutes, 3.0);
        assert_eq!(a12.played_first_half_minutes, 1.0);

        let a7 = report.rows.iter().find(|r| r.team == TeamSide::A && r.number == 7).unwrap();
        assert_eq!(a7.state, PlayerState::Excluded);
        assert_eq!(a7.penalty_minutes, 2.0);
        assert!(report.active_penalties.is_empty());
        Ok(())
    }

    #[test]
    fn test_config_override_wins() -> Result<()> {
        let script = parse_script(
            r#"
config:
  exclusion_duration_seconds: 60
steps:
  - at: 0
    action: save_team
    team: A
    numbers: [1, 2]
  - at: 0
    action: register_starters
    team: A
    starters: [1]
  - at: 0
    action: start
  - at: 10
    action: exclude
    team: A
    number: 1
  - at: 100
    action: confirm_return
    team: A
    number: 2
"#,
        )?;

        let report = run_script(&script, None)?;
        assert!(report.failures.is_empty());

        let report = run_script(&script, Some(MatchConfig::standard()))?;
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, "NoExpiredPenalty");
        assert_eq!(report.active_penalties.len(), 1);
        assert_eq!(report.active_penalties[0].number, 1);
        assert!((report.active_penalties[0].remaining_seconds - 30.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_out_of_order_step_runs_at_current_time() -> Result<()> {
        let script = parse_script(
            r#"
steps:
  - at: 0
    action: save_team
    team: A
    numbers: [1, 2]
  - at: 0
    action: register_starters
    team: A
    starters: [1]
  - at: 0
    action: start
  - at: 50
    action: pause
  - at: 20
    action: start
  - at: 60
    action: pause
"#,
        )?;
        let report = run_script(&script, None)?;
        assert!((report.elapsed - 60.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_load_files_and_write_reports() -> Result<()> {
        let mut script_file = NamedTempFile::new()?;
        script_file.write_all(SCRIPT.as_bytes())?;
        let mut config_file = NamedTempFile::new()?;
        config_file.write_all(MatchConfig::manual_escalation().to_yaml_string()?.as_bytes())?;

        let script = load_script(script_file.path())?;
        let config = load_config(config_file.path())?;
        assert_eq!(config, MatchConfig::manual_escalation());

        let report = run_script(&script, Some(config))?;
        let csv = report_csv(&report)?;
        assert!(csv.starts_with("team,number,state,"));
        assert_eq!(csv.lines().count(), 1 + 6);

        let out = NamedTempFile::new()?;
        save_report(out.path(), &report_json(&report)?)?;
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.path())?)?;
        assert_eq!(parsed["applied"], 8);
        assert_eq!(parsed["rows"].as_array().map(|r| r.len()), Some(6));
        Ok(())
    }

    #[test]
    fn test_invalid_inputs_have_context() {
        let err = parse_script("steps:\n  - at: 0\n    action: dance\n").unwrap_err();
        assert!(err.to_string().contains("replay script"));

        let err = load_config(Path::new("/definitely/missing/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));

        let err = parse_script("config:\n  exclusion_duration_seconds: 0\nsteps: []\n").unwrap_err();
        assert!(err.to_string().contains("Invalid config"));

        for at in ["1.0e30", "-5", ".nan", ".inf"] {
            let text = format!("steps:\n  - at: {}\n    action: start\n", at);
            let err = parse_script(&text).unwrap_err();
            assert!(err.to_string().contains("outside"), "{}: {}", at, err);
        }
    }
}
