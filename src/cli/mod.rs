//! Command-line parsing for the FRED-based economic panel builder.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the alignment code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{MERGED_ARTIFACT, ViewKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "econ", version, about = "Monthly economic indicator panel builder (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Retrieve all configured series from FRED and write one raw CSV each.
    Fetch(RunArgs),
    /// Build the monthly panel from previously fetched raw CSVs and export
    /// the merged/indexed/min-max artifacts.
    Build(RunArgs),
    /// Fetch then build in one go (the default when no subcommand is given).
    Run(RunArgs),
    /// Render an ASCII chart of an exported artifact.
    Chart(ChartArgs),
}

/// Common options for fetching and building.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Window start (inclusive); its calendar month becomes the first grid row.
    #[arg(long, default_value = "2015-01-01")]
    pub start: NaiveDate,

    /// Window end (inclusive); defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Directory for the per-series raw CSVs.
    #[arg(long, default_value = "data/raw")]
    pub raw_dir: PathBuf,

    /// Directory for the exported artifacts and the run manifest.
    #[arg(long, default_value = "data/processed")]
    pub out_dir: PathBuf,

    /// Restrict the run to these catalog codes (repeatable; catalog order is
    /// preserved regardless of flag order).
    #[arg(long = "series", value_name = "CODE")]
    pub series: Vec<String>,

    /// Mark a code as non-mandatory: if it has no usable data it is skipped
    /// and reported instead of failing the run (repeatable).
    #[arg(long = "optional", value_name = "CODE")]
    pub optional: Vec<String>,

    /// Use the seeded synthetic source instead of the FRED API.
    #[arg(long)]
    pub offline: bool,

    /// Seed for the synthetic source (offline runs only).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// How many rows of the merged panel to preview in the run summary.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

/// Options for charting an exported artifact.
#[derive(Debug, Parser)]
pub struct ChartArgs {
    /// Which artifact to chart.
    #[arg(long, value_enum, default_value_t = ChartSource::Indexed)]
    pub view: ChartSource,

    /// Directory holding the exported artifacts.
    #[arg(long, default_value = "data/processed")]
    pub out_dir: PathBuf,

    /// Chart only these catalog codes (repeatable; default: all columns).
    #[arg(long = "series", value_name = "CODE")]
    pub series: Vec<String>,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Which exported artifact `econ chart` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartSource {
    /// The filled merged dataset (raw levels; mixed scales).
    Merged,
    /// The index-to-100 view (comparable growth).
    Indexed,
    /// The min-max [0, 1] view.
    MinMax,
}

impl ChartSource {
    /// File name of the artifact this source reads.
    pub fn artifact_name(self) -> &'static str {
        match self {
            ChartSource::Merged => MERGED_ARTIFACT,
            ChartSource::Indexed => ViewKind::Indexed.artifact_name(),
            ChartSource::MinMax => ViewKind::MinMax.artifact_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_args_parse_with_defaults() {
        let cli = Cli::try_parse_from(["econ", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(args.end, None);
        assert_eq!(args.raw_dir, PathBuf::from("data/raw"));
        assert!(!args.offline);
        assert_eq!(args.seed, 42);
    }

    #[test]
    fn repeatable_flags_accumulate() {
        let cli = Cli::try_parse_from([
            "econ", "build", "--series", "GDP", "--series", "SP500", "--optional", "SP500",
            "--offline",
        ])
        .unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build subcommand");
        };
        assert_eq!(args.series, vec!["GDP", "SP500"]);
        assert_eq!(args.optional, vec!["SP500"]);
        assert!(args.offline);
    }

    #[test]
    fn chart_view_maps_to_artifact_names() {
        assert_eq!(ChartSource::Merged.artifact_name(), "merged_data.csv");
        assert_eq!(ChartSource::Indexed.artifact_name(), "merged_data_normalized.csv");
        assert_eq!(ChartSource::MinMax.artifact_name(), "merged_data_minmax.csv");
    }

    #[test]
    fn invalid_date_flag_is_rejected() {
        assert!(Cli::try_parse_from(["econ", "run", "--start", "yesterday"]).is_err());
    }
}
