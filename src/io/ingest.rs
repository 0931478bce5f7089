//! Raw series CSV ingest.
//!
//! Each configured series has one raw CSV under the raw directory, written by
//! `econ fetch` and re-read by `econ build` — the file format is the contract
//! between the two commands.
//!
//! Design goals:
//! - **Strict schema** for the header (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no alignment logic here

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{DATE_COLUMN, Observation, RawSeries, SeriesSpec};
use crate::error::{PanelError, Result};

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output for one series: the usable observations plus what was
/// skipped along the way.
#[derive(Debug)]
pub struct IngestedSeries {
    pub series: RawSeries,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Path of a series' raw CSV under the raw directory.
pub fn raw_series_path(raw_dir: &Path, spec: &SeriesSpec) -> PathBuf {
    raw_dir.join(format!("{}.csv", spec.code))
}

/// Load one series' raw CSV.
///
/// The header must be `DATE` followed by exactly one value column (the
/// column name itself is informational; the file name keyed us to the
/// series). Dates are strict ISO-8601 since this crate writes these files
/// itself. FRED's `"."` placeholder and empty cells become missing values;
/// malformed rows are collected and reported, not fatal.
pub fn load_raw_series(raw_dir: &Path, spec: &SeriesSpec) -> Result<IngestedSeries> {
    let path = raw_series_path(raw_dir, spec);
    let file = File::open(&path).map_err(|source| PanelError::FileRead {
        path: path.clone(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| PanelError::Csv {
        path: path.clone(),
        message: format!("failed to read header: {e}"),
    })?;

    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    if names.len() != 2 || !names[0].eq_ignore_ascii_case(DATE_COLUMN) {
        return Err(PanelError::Csv {
            path: path.clone(),
            message: format!(
                "expected header `{DATE_COLUMN},<value>`, found `{}`",
                names.join(",")
            ),
        });
    }

    let mut observations: Vec<Observation> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(date_field) = record.get(0).map(str::trim).filter(|s| !s.is_empty()) else {
            row_errors.push(RowError {
                line,
                message: "missing date".to_string(),
            });
            continue;
        };

        let date = match NaiveDate::parse_from_str(date_field, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("invalid date '{date_field}': {e}"),
                });
                continue;
            }
        };

        let value = match parse_cell(record.get(1)) {
            Ok(v) => v,
            Err(message) => {
                row_errors.push(RowError { line, message });
                continue;
            }
        };

        observations.push(Observation::new(date, value));
    }

    observations.sort_by_key(|o| o.date);
    for pair in observations.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(PanelError::Csv {
                path,
                message: format!("duplicate date {}", pair[0].date),
            });
        }
    }

    for err in &row_errors {
        warn!(
            code = %spec.code,
            line = err.line,
            "skipped raw CSV row: {}",
            err.message
        );
    }

    Ok(IngestedSeries {
        series: RawSeries::new(spec.clone(), observations),
        rows_read,
        row_errors,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header. If we don't strip it, schema validation would
    // incorrectly reject the file.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_cell(cell: Option<&str>) -> std::result::Result<Option<f64>, String> {
    let Some(raw) = cell.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw == "." {
        return Ok(None);
    }
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("invalid value '{raw}'"))?;
    if v.is_finite() {
        Ok(Some(v))
    } else {
        Err(format!("non-finite value '{raw}'"))
    }
}
