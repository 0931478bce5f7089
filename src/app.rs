//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches FRED data (or generates offline samples)
//! - runs the alignment pipeline
//! - exports artifacts and prints reports
//!
//! All file and network I/O for a run happens here, around the pure
//! `pipeline` core.

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{ChartArgs, Command, RunArgs};
use crate::data::fred::FredClient;
use crate::data::sample;
use crate::domain::{MERGED_ARTIFACT, RawSeries, RunConfig, default_catalog};
use crate::error::{PanelError, Result};
use crate::io::export::{self, RunManifest};
use crate::io::ingest;

pub mod pipeline;

/// Entry point for the `econ` binary.
pub fn run() -> Result<()> {
    init_logging();

    // We want bare `econ` (and `econ --offline ...`) to behave like
    // `econ run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Build(args) => handle_build(args),
        Command::Run(args) => handle_run(args),
        Command::Chart(args) => handle_chart(args),
    }
}

fn init_logging() {
    // Reports on stdout are the primary surface; logging defaults to warn
    // and opens up via RUST_LOG.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .ok();
}

fn handle_fetch(args: RunArgs) -> Result<()> {
    let config = run_config_from_args(&args)?;
    let raw = retrieve_series(&config)?;
    for series in &raw {
        export::write_raw_series(&config.raw_dir, series)?;
    }
    println!("{}", crate::report::format_fetch_report(&raw));
    Ok(())
}

fn handle_build(args: RunArgs) -> Result<()> {
    let config = run_config_from_args(&args)?;
    let raw = ingest_raw_series(&config)?;
    build_and_export(&raw, &config)
}

fn handle_run(args: RunArgs) -> Result<()> {
    let config = run_config_from_args(&args)?;
    let raw = retrieve_series(&config)?;
    for series in &raw {
        export::write_raw_series(&config.raw_dir, series)?;
    }
    println!("{}", crate::report::format_fetch_report(&raw));
    build_and_export(&raw, &config)
}

fn handle_chart(args: ChartArgs) -> Result<()> {
    let path = args.out_dir.join(args.view.artifact_name());
    let mut artifact = export::read_artifact(&path)?;

    if !args.series.is_empty() {
        let catalog = default_catalog();
        let mut wanted = Vec::new();
        for code in &args.series {
            // Artifact columns carry human labels; resolve catalog codes to
            // labels, and accept a literal label for ad-hoc columns.
            let label = catalog
                .iter()
                .find(|s| s.code.eq_ignore_ascii_case(code))
                .map(|s| s.label.clone())
                .unwrap_or_else(|| code.clone());
            if !artifact.columns.iter().any(|(l, _)| *l == label) {
                return Err(PanelError::Config(format!(
                    "series `{code}` not present in {}",
                    path.display()
                )));
            }
            wanted.push(label);
        }
        artifact.columns.retain(|(label, _)| wanted.contains(label));
    }

    println!("{}", crate::plot::render_chart(&artifact, args.width, args.height));
    Ok(())
}

/// Retrieve raw observations for every configured series, online or offline.
fn retrieve_series(config: &RunConfig) -> Result<Vec<RawSeries>> {
    if config.offline {
        sample::generate_all(&config.series, config.start, config.end, config.sample_seed)
    } else {
        let client = FredClient::from_env()?;
        client.fetch_all(&config.series, config.start, config.end)
    }
}

/// Re-read the raw CSVs written by a previous fetch.
///
/// A missing or unusable file fails the run for a required series; an
/// optional one is skipped here and reported, mirroring the pipeline's
/// policy for empty series.
fn ingest_raw_series(config: &RunConfig) -> Result<Vec<RawSeries>> {
    let mut raw = Vec::with_capacity(config.series.len());
    for spec in &config.series {
        match ingest::load_raw_series(&config.raw_dir, spec) {
            Ok(ingested) => raw.push(ingested.series),
            Err(err) if !spec.required => {
                warn!(code = %spec.code, "skipping optional series: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(raw)
}

/// Run the pipeline, export everything exportable, then surface the first
/// view failure (the merged artifact is valid output either way).
fn build_and_export(raw: &[RawSeries], config: &RunConfig) -> Result<()> {
    let output = pipeline::run_pipeline(raw, config)?;

    let merged_path = config.out_dir.join(MERGED_ARTIFACT);
    export::write_table_csv(&merged_path, &output.table)?;

    let mut artifact_paths: Vec<PathBuf> = vec![merged_path];
    for (kind, result) in &output.views {
        if let Ok(view) = result {
            let path = config.out_dir.join(kind.artifact_name());
            export::write_table_csv(&path, view)?;
            artifact_paths.push(path);
        }
    }

    let manifest = RunManifest {
        start: config.start,
        end: config.end,
        grid_months: output.grid.len(),
        series: output.table.columns.iter().map(|c| c.spec.clone()).collect(),
        artifacts: artifact_paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect(),
    };
    export::write_manifest(&config.out_dir, &manifest)?;

    let paths: Vec<&std::path::Path> = artifact_paths.iter().map(PathBuf::as_path).collect();
    println!(
        "{}",
        crate::report::format_run_summary(config, &output, &paths)
    );
    println!("{}", crate::report::format_preview(&output.table, config.preview_rows));

    for (_, result) in output.views {
        result?;
    }
    Ok(())
}

/// Resolve CLI flags into the pipeline's explicit configuration.
pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig> {
    let catalog = default_catalog();

    let mut series = if args.series.is_empty() {
        catalog
    } else {
        for code in &args.series {
            if !catalog.iter().any(|s| s.code.eq_ignore_ascii_case(code)) {
                return Err(PanelError::Config(format!(
                    "unknown series code `{code}` (catalog: {})",
                    catalog
                        .iter()
                        .map(|s| s.code.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        }
        // Catalog order, not flag order, decides column order.
        catalog
            .into_iter()
            .filter(|s| args.series.iter().any(|c| s.code.eq_ignore_ascii_case(c)))
            .collect()
    };

    for code in &args.optional {
        let Some(spec) = series.iter_mut().find(|s| s.code.eq_ignore_ascii_case(code)) else {
            return Err(PanelError::Config(format!(
                "cannot mark `{code}` optional: not part of this run"
            )));
        };
        spec.required = false;
    }

    let config = RunConfig {
        start: args.start,
        end: args.end.unwrap_or_else(|| Utc::now().date_naive()),
        series,
        raw_dir: args.raw_dir.clone(),
        out_dir: args.out_dir.clone(),
        offline: args.offline,
        sample_seed: args.seed,
        preview_rows: args.preview,
    };
    config.validate()?;
    Ok(config)
}

/// Rewrite argv so `econ` defaults to `econ run`.
///
/// Rules:
/// - `econ`                     -> `econ run`
/// - `econ --offline ...`       -> `econ run --offline ...`
/// - `econ --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fetch" | "build" | "run" | "chart");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn args_from(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Run(args) | Command::Build(args) | Command::Fetch(args) => args,
            Command::Chart(_) => panic!("unexpected chart subcommand"),
        }
    }

    fn strings(argv: &[&str]) -> Vec<String> {
        argv.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_rewrites_to_run() {
        assert_eq!(rewrite_args(strings(&["econ"])), strings(&["econ", "run"]));
        assert_eq!(
            rewrite_args(strings(&["econ", "--offline"])),
            strings(&["econ", "run", "--offline"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(strings(&["econ", "fetch"])),
            strings(&["econ", "fetch"])
        );
        assert_eq!(
            rewrite_args(strings(&["econ", "--help"])),
            strings(&["econ", "--help"])
        );
    }

    #[test]
    fn series_subset_preserves_catalog_order() {
        // SP500 declared last in the catalog even though it's requested first.
        let args = args_from(&["econ", "run", "--series", "SP500", "--series", "GDP"]);
        let config = run_config_from_args(&args).unwrap();
        let codes: Vec<&str> = config.series.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["GDP", "SP500"]);
    }

    #[test]
    fn unknown_series_code_is_rejected() {
        let args = args_from(&["econ", "run", "--series", "NOPE"]);
        let err = run_config_from_args(&args).unwrap_err();
        assert!(err.to_string().contains("unknown series code"));
    }

    #[test]
    fn optional_flag_downgrades_required() {
        let args = args_from(&["econ", "run", "--optional", "SP500"]);
        let config = run_config_from_args(&args).unwrap();
        let sp500 = config.series.iter().find(|s| s.code == "SP500").unwrap();
        assert!(!sp500.required);
        assert!(config.series.iter().filter(|s| s.required).count() > 0);
    }

    #[test]
    fn optional_outside_the_run_is_rejected() {
        let args = args_from(&[
            "econ", "run", "--series", "GDP", "--optional", "SP500",
        ]);
        assert!(run_config_from_args(&args).is_err());
    }

    #[test]
    fn end_defaults_to_today() {
        let args = args_from(&["econ", "run"]);
        let config = run_config_from_args(&args).unwrap();
        assert_eq!(config.end, Utc::now().date_naive());
    }
}
