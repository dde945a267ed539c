//! Tabular time report
//!
//! One row per `(team, player)` with every bucket converted to minutes and
//! rounded to one decimal. Penalty minutes come from the penalty records
//! (capped per penalty), not from the ledger's penalty bucket.

use std::io;

use serde::{Deserialize, Serialize};

use crate::clock::WallClock;
use crate::engine::Match;
use crate::models::{PlayerState, TeamSide};

/// Column order of the CSV report.
pub const EXPORT_COLUMNS: [&str; 9] = [
    "team",
    "number",
    "state",
    "exclusion_count",
    "played_first_half_minutes",
    "played_second_half_minutes",
    "played_total_minutes",
    "bench_minutes",
    "penalty_minutes",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub team: TeamSide,
    pub number: u32,
    pub state: PlayerState,
    pub exclusion_count: u32,
    pub played_first_half_minutes: f64,
    pub played_second_half_minutes: f64,
    pub played_total_minutes: f64,
    pub bench_minutes: f64,
    pub penalty_minutes: f64,
}

/// Seconds to minutes, rounded to one decimal.
pub fn to_minutes(seconds: f64) -> f64 {
    (seconds / 60.0 * 10.0).round() / 10.0
}

/// Builds the report from the ledger as of the last tick, team A first,
/// players by shirt number.
pub fn export_rows<C: WallClock>(m: &Match<C>) -> Vec<ExportRow> {
    let now = m.elapsed();
    m.roster()
        .players()
        .map(|(team, player)| {
            let entry = m.ledger().entry(team, player.number);
            ExportRow {
                team,
                number: player.number,
                state: player.state,
                exclusion_count: player.exclusion_count,
                played_first_half_minutes: to_minutes(entry.played_first_half),
                played_second_half_minutes: to_minutes(entry.played_second_half),
                played_total_minutes: to_minutes(entry.played_total()),
                bench_minutes: to_minutes(entry.bench),
                penalty_minutes: to_minutes(m.penalty_seconds_served(team, player.number, now)),
            }
        })
        .collect()
}

/// Writes `rows` as CSV with a header line.
pub fn write_csv<W: io::Write>(rows: &[ExportRow], writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        out.write_record(EXPORT_COLUMNS)?;
    }
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}
