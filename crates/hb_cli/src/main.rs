//! Handball match replay CLI
//!
//! `hb replay <script.yaml>` replays a timed action script and prints the
//! time report; `hb config` prints a configuration preset as YAML.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use env_logger::Env;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "hb")]
#[command(about = "Replay handball match scripts and export time reports", long_about = None)]
struct Cli {
    /// Log engine actions (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Replay a timed action script
    Replay {
        /// Script file (YAML)
        script: PathBuf,

        /// Config file (YAML), overrides the script's config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Full JSON report (rows, failures, events) instead of CSV
        #[arg(long, default_value = "false")]
        json: bool,

        /// Exit with an error if any step was rejected
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Print a configuration preset
    Config {
        #[arg(long, value_enum, default_value = "standard")]
        preset: Preset,
    },
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Standard,
    ManualEscalation,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Replay {
            script,
            config,
            out,
            json,
            strict,
        } => {
            let parsed = hb_cli::load_script(&script)?;
            let config = config.as_deref().map(hb_cli::load_config).transpose()?;
            let report = hb_cli::run_script(&parsed, config)?;

            let contents = if json {
                hb_cli::report_json(&report)?
            } else {
                hb_cli::report_csv(&report)?
            };
            match out {
                Some(path) => {
                    hb_cli::save_report(&path, &contents)?;
                    eprintln!("Report saved to: {}", path.display());
                }
                None => print!("{}", contents),
            }

            for failure in &report.failures {
                eprintln!("step {} at {:.1}s: {}", failure.step, failure.at, failure.message);
            }
            if strict && !report.failures.is_empty() {
                anyhow::bail!("{} of {} steps rejected", report.failures.len(), parsed.steps.len());
            }
        }

        Commands::Config { preset } => {
            let config = match preset {
                Preset::Standard => hb_core::MatchConfig::standard(),
                Preset::ManualEscalation => hb_core::MatchConfig::manual_escalation(),
            };
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("hb CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
