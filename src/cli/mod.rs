//! Command-line parsing for `kmass`.
//!
//! Argument parsing and command dispatch stay separate from the catalog and
//! statistics code; `app` converts these structs into plain config values.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{EmptyScenarioPolicy, PhysicalConstants};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "kmass",
    version,
    about = "Estimate Earth's mass from a satellite catalog using Kepler's third law"
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the mass once at a fixed eccentricity qualifier and export Kepler data.
    Run(RunArgs),
    /// Sweep the eccentricity qualifier and export per-threshold statistics.
    Sweep(SweepArgs),
    /// Clean a raw catalog export (field counts, recomputed eccentricity).
    Preprocess(PreprocessArgs),
    /// Plot a previously exported result file.
    #[command(subcommand)]
    Plot(PlotCommand),
}

/// Options shared by `run` and `sweep`.
#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// Satellite catalog (delimited text with the published column names).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output CSV path.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Field delimiter: `tab`, `comma`, or a single ASCII character.
    #[arg(long, default_value = "tab", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Also estimate with the orbital-velocity method.
    #[arg(long)]
    pub secondary: bool,

    /// Gravitational constant (m^3 kg^-1 s^-2).
    #[arg(long, default_value_t = PhysicalConstants::EARTH.gravitational_constant)]
    pub gravitational_constant: f64,

    /// Radius of the central body (m).
    #[arg(long, default_value_t = PhysicalConstants::EARTH.body_radius_m)]
    pub earth_radius: f64,

    /// Accepted mass used for percent errors (kg).
    #[arg(long, default_value_t = PhysicalConstants::EARTH.reference_mass_kg)]
    pub reference_mass: f64,

    /// Print every parsed record.
    #[arg(long)]
    pub show_records: bool,

    #[command(flatten)]
    pub plot: PlotFlags,
}

#[derive(Debug, Args, Clone)]
pub struct PlotFlags {
    /// Render an ASCII plot in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Maximum eccentricity a record may have to qualify (0 = circular only).
    #[arg(short, long = "ecc", value_name = "E")]
    pub ecc: f64,
}

#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Lowest eccentricity qualifier.
    #[arg(long, visible_alias = "meq-min")]
    pub min: f64,

    /// Highest eccentricity qualifier.
    #[arg(long, visible_alias = "meq-max")]
    pub max: f64,

    /// Number of intervals between min and max (steps + 1 thresholds, at most 1,000,000).
    #[arg(long, visible_alias = "meq-steps")]
    pub steps: usize,

    /// What to do when a threshold leaves no qualifying records.
    #[arg(long, value_enum, default_value_t = EmptyScenarioPolicy::Skip)]
    pub on_empty: EmptyScenarioPolicy,
}

#[derive(Debug, Args, Clone)]
pub struct PreprocessArgs {
    /// Raw catalog.
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Cleaned catalog.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Field delimiter: `tab`, `comma`, or a single ASCII character.
    #[arg(long, default_value = "tab", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

#[derive(Debug, Subcommand)]
pub enum PlotCommand {
    /// Kepler data written by `kmass run` (x vs y with the fitted line).
    Kepler(PlotFileArgs),
    /// Sweep table written by `kmass sweep` (qualifier vs percent error).
    Sweep(PlotFileArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PlotFileArgs {
    /// Exported CSV.
    #[arg(value_name = "CSV")]
    pub file: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        _ => {
            let bytes = s.as_bytes();
            if bytes.len() == 1 && bytes[0].is_ascii() {
                Ok(bytes[0])
            } else {
                Err(format!("expected `tab`, `comma`, or a single ASCII character, got `{s}`"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_names() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("comma").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter("::").is_err());
    }

    #[test]
    fn parses_sweep_with_meq_aliases() {
        let cli = Cli::try_parse_from([
            "kmass", "sweep", "-i", "in.txt", "-o", "out.csv", "--meq-min", "0", "--meq-max", "0.2",
            "--meq-steps", "4",
        ])
        .unwrap();
        let Command::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.steps, 4);
        assert_eq!(args.max, 0.2);
        assert_eq!(args.on_empty, EmptyScenarioPolicy::Skip);
        assert_eq!(args.catalog.delimiter, b'\t');
    }

    #[test]
    fn run_requires_ecc() {
        assert!(Cli::try_parse_from(["kmass", "run", "-i", "a", "-o", "b"]).is_err());
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::try_parse_from(["kmass", "run", "-i", "a", "-o", "b", "--ecc", "0.1", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
