//! Tabular artifact export and re-import.
//!
//! Three processed artifacts (merged, indexed, min-max) plus one raw CSV per
//! series are the sole contract toward any downstream loader; a relational
//! bulk-loader can infer column types from the header and values alone.
//!
//! Output is byte-stable: no wall-clock anywhere, dates as `%Y-%m-%d`, and
//! values in Rust's shortest round-trip `f64` form, so re-running with
//! identical inputs overwrites each file with identical bytes.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{DATE_COLUMN, MANIFEST_FILE, RawSeries, SeriesSpec};
use crate::error::{PanelError, Result};
use crate::panel::FilledTable;

/// Write one series' raw observations to `<raw_dir>/<CODE>.csv`.
///
/// Header is `DATE,<label>`; missing values become empty cells, which ingest
/// reads back as missing.
pub fn write_raw_series(raw_dir: &Path, raw: &RawSeries) -> Result<PathBuf> {
    fs::create_dir_all(raw_dir).map_err(|source| PanelError::FileWrite {
        path: raw_dir.to_path_buf(),
        source,
    })?;

    let path = raw_dir.join(format!("{}.csv", raw.spec.code));
    let file = File::create(&path).map_err(|source| PanelError::FileWrite {
        path: path.clone(),
        source,
    })?;
    let mut out = BufWriter::new(file);

    let write_err = |source| PanelError::FileWrite {
        path: path.clone(),
        source,
    };

    writeln!(out, "{DATE_COLUMN},{}", raw.spec.label).map_err(write_err)?;
    for obs in &raw.observations {
        match obs.value {
            Some(v) => writeln!(out, "{},{v}", obs.date.format("%Y-%m-%d")).map_err(write_err)?,
            None => writeln!(out, "{},", obs.date.format("%Y-%m-%d")).map_err(write_err)?,
        }
    }
    out.flush().map_err(write_err)?;

    Ok(path)
}

/// Write a filled table (the merged dataset or a derived view) as a CSV
/// artifact: `DATE` first, then one column per series labeled by its
/// human-readable name, rows in ascending grid order.
pub fn write_table_csv(path: &Path, table: &FilledTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PanelError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| PanelError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);

    let write_err = |source| PanelError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut header = String::from(DATE_COLUMN);
    for column in &table.columns {
        header.push(',');
        header.push_str(&column.spec.label);
    }
    writeln!(out, "{header}").map_err(write_err)?;

    for (row, month) in table.months.iter().enumerate() {
        let mut line = month.format("%Y-%m-%d").to_string();
        for column in &table.columns {
            line.push(',');
            line.push_str(&column.values[row].to_string());
        }
        writeln!(out, "{line}").map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    info!(path = %path.display(), rows = table.row_count(), "wrote artifact");
    Ok(())
}

/// Everything a downstream loader needs to know about one run's artifacts.
///
/// Deliberately carries no wall-clock field so the manifest is as idempotent
/// as the artifacts it describes.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub grid_months: usize,
    pub series: Vec<SeriesSpec>,
    pub artifacts: Vec<String>,
}

/// Write the run manifest next to the artifacts.
pub fn write_manifest(out_dir: &Path, manifest: &RunManifest) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|source| PanelError::FileWrite {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let path = out_dir.join(MANIFEST_FILE);
    let file = File::create(&path).map_err(|source| PanelError::FileWrite {
        path: path.clone(),
        source,
    })?;
    serde_json::to_writer_pretty(file, manifest)?;

    Ok(path)
}

/// A re-loaded artifact: dates plus labeled value columns, used by
/// `econ chart`.
#[derive(Debug, Clone)]
pub struct ArtifactTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<(String, Vec<f64>)>,
}

/// Read a previously exported artifact back into memory.
///
/// Artifacts are filled tables, so every cell must hold a number; anything
/// else means the file is not one of ours.
pub fn read_artifact(path: &Path) -> Result<ArtifactTable> {
    let file = File::open(path).map_err(|source| PanelError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| PanelError::Csv {
        path: path.to_path_buf(),
        message: format!("failed to read header: {e}"),
    })?;

    let labels: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    if labels.is_empty() {
        return Err(PanelError::Csv {
            path: path.to_path_buf(),
            message: "artifact has no value columns".to_string(),
        });
    }

    let mut dates = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); labels.len()];

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| PanelError::Csv {
            path: path.to_path_buf(),
            message: format!("line {line}: {e}"),
        })?;

        let date_field = record.get(0).unwrap_or_default();
        let date =
            NaiveDate::parse_from_str(date_field, "%Y-%m-%d").map_err(|e| PanelError::Csv {
                path: path.to_path_buf(),
                message: format!("line {line}: invalid date '{date_field}': {e}"),
            })?;
        dates.push(date);

        for (col, slot) in values.iter_mut().enumerate() {
            let cell = record.get(col + 1).unwrap_or_default();
            let v = cell.parse::<f64>().map_err(|_| PanelError::Csv {
                path: path.to_path_buf(),
                message: format!("line {line}: invalid value '{cell}'"),
            })?;
            slot.push(v);
        }
    }

    Ok(ArtifactTable {
        dates,
        columns: labels.into_iter().zip(values).collect(),
    })
}
