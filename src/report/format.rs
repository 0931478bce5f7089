//! Formatted terminal output for fetch and build runs.
//!
//! We keep formatting code in one place so:
//! - the alignment code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use std::path::Path;

use crate::app::pipeline::PipelineOutput;
use crate::domain::{RawSeries, RunConfig};
use crate::panel::FilledTable;

/// Format the per-series fetch report.
pub fn format_fetch_report(fetched: &[RawSeries]) -> String {
    let mut out = String::new();

    out.push_str("=== econ - series retrieval ===\n");
    out.push_str(&format!(
        "{:<10} {:<36} {:<10} {:>8}\n",
        "code", "label", "freq", "rows"
    ));
    for raw in fetched {
        out.push_str(&format!(
            "{:<10} {:<36} {:<10} {:>8}\n",
            raw.spec.code,
            truncate(&raw.spec.label, 36),
            raw.spec.frequency.display_name(),
            raw.observations.len(),
        ));
    }

    out
}

/// Format the full run summary: window, grid, per-series stats, skips,
/// view failures, and the exported artifacts.
pub fn format_run_summary(
    config: &RunConfig,
    output: &PipelineOutput,
    artifacts: &[&Path],
) -> String {
    let mut out = String::new();

    out.push_str("=== econ - monthly panel build ===\n");
    out.push_str(&format!("Window: {} .. {}\n", config.start, config.end));
    out.push_str(&format!(
        "Grid: {} months ({} .. {})\n",
        output.grid.len(),
        output
            .grid
            .first()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        output
            .grid
            .last()
            .map(|d| d.to_string())
            .unwrap_or_default(),
    ));

    out.push_str("\nSeries:\n");
    out.push_str(&format!(
        "{:<10} {:<36} {:<10} {:>8} {:>8}\n",
        "code", "label", "freq", "raw", "monthly"
    ));
    for report in &output.reports {
        out.push_str(&format!(
            "{:<10} {:<36} {:<10} {:>8} {:>8}\n",
            report.spec.code,
            truncate(&report.spec.label, 36),
            report.spec.frequency.display_name(),
            report.raw_rows,
            report.monthly_points,
        ));
    }
    for (spec, err) in &output.skipped {
        out.push_str(&format!("  (skipped {}) {err}\n", spec.code));
    }

    for (kind, result) in &output.views {
        if let Err(err) = result {
            out.push_str(&format!(
                "\nView {} failed: {err}\n",
                kind.display_name()
            ));
        }
    }

    if !artifacts.is_empty() {
        out.push_str("\nArtifacts:\n");
        for path in artifacts {
            out.push_str(&format!("- {}\n", path.display()));
        }
    }

    out
}

/// Format the first `rows` rows of the merged panel, one aligned column per
/// series, codes as column headers.
pub fn format_preview(table: &FilledTable, rows: usize) -> String {
    let rows = rows.min(table.row_count());
    let mut out = String::new();

    out.push_str(&format!("{:<12}", "DATE"));
    for column in &table.columns {
        out.push_str(&format!(" {:>12}", truncate(&column.spec.code, 12)));
    }
    out.push('\n');

    for i in 0..rows {
        out.push_str(&format!("{:<12}", table.months[i]));
        for column in &table.columns {
            out.push_str(&format!(" {:>12.4}", column.values[i]));
        }
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_pipeline;
    use crate::domain::{Frequency, Observation, SeriesSpec};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_output() -> (RunConfig, PipelineOutput) {
        let spec = SeriesSpec::new("UNRATE", "Unemployment Rate", Frequency::Monthly);
        let raw = vec![RawSeries::new(
            spec.clone(),
            vec![
                Observation::new(date(2024, 1, 1), Some(3.7)),
                Observation::new(date(2024, 3, 1), Some(3.9)),
            ],
        )];
        let config = RunConfig {
            start: date(2024, 1, 1),
            end: date(2024, 3, 31),
            series: vec![spec],
            raw_dir: PathBuf::from("data/raw"),
            out_dir: PathBuf::from("data/processed"),
            offline: true,
            sample_seed: 42,
            preview_rows: 5,
        };
        let output = run_pipeline(&raw, &config).unwrap();
        (config, output)
    }

    #[test]
    fn run_summary_names_window_series_and_artifacts() {
        let (config, output) = sample_output();
        let merged = PathBuf::from("data/processed/merged_data.csv");
        let summary = format_run_summary(&config, &output, &[merged.as_path()]);

        assert!(summary.contains("Window: 2024-01-01 .. 2024-03-31"));
        assert!(summary.contains("Grid: 3 months"));
        assert!(summary.contains("UNRATE"));
        assert!(summary.contains("merged_data.csv"));
    }

    #[test]
    fn preview_caps_at_table_length() {
        let (_, output) = sample_output();
        let preview = format_preview(&output.table, 10);
        // Header plus three data rows.
        assert_eq!(preview.lines().count(), 4);
        assert!(preview.starts_with("DATE"));
        assert!(preview.contains("2024-01-01"));
    }

    #[test]
    fn fetch_report_lists_each_series() {
        let spec = SeriesSpec::new("SP500", "S&P 500 Index", Frequency::Daily);
        let fetched = vec![RawSeries::new(
            spec,
            vec![Observation::new(date(2024, 1, 2), Some(4742.83))],
        )];
        let report = format_fetch_report(&fetched);
        assert!(report.contains("SP500"));
        assert!(report.contains("daily"));
    }

    #[test]
    fn truncate_marks_shortened_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-rather-long-label", 8), "a-rathe.");
    }
}
