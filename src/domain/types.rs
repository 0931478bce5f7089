//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while aligning and merging series
//! - exported to CSV artifacts and the run manifest
//! - reloaded later for charting

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Native reporting cadence of a series, as declared in the catalog.
///
/// Everything is reconciled onto a monthly calendar before merging; the
/// native frequency only decides *how* a series gets there (see
/// `panel::normalize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Monthly,
    Quarterly,
}

impl Frequency {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }
}

/// A single raw (date, value) pair as supplied by the retrieval side.
///
/// `value: None` means the source reported the date but no usable number
/// (FRED emits `"."` for market holidays and suppressed readings).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// A configured series: stable code (unique key), human label, and native
/// frequency.
///
/// `required` realizes the "mandatory per configuration" rule: a required
/// series with no usable observations fails the whole run, while an
/// optional one is dropped and reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub code: String,
    pub label: String,
    pub frequency: Frequency,
    pub required: bool,
}

impl SeriesSpec {
    /// A required series.
    pub fn new(code: impl Into<String>, label: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            frequency,
            required: true,
        }
    }
}

/// Raw observations for one series, exactly as retrieved.
///
/// The core treats this as read-only input; it never mutates observations
/// in place.
#[derive(Debug, Clone)]
pub struct RawSeries {
    pub spec: SeriesSpec,
    pub observations: Vec<Observation>,
}

impl RawSeries {
    pub fn new(spec: SeriesSpec, observations: Vec<Observation>) -> Self {
        Self { spec, observations }
    }
}

/// Normalizer output: one value per calendar month, anchored to month
/// start, strictly increasing, no duplicates, no missing values.
///
/// Months the series never reported stay absent here; the merger's fill
/// policy is responsible for them.
#[derive(Debug, Clone)]
pub struct MonthlySeries {
    pub spec: SeriesSpec,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Which derived comparison view of the merged dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Every column rescaled so the first grid row equals 100.
    Indexed,
    /// Every column rescaled into [0, 1] by its own min and max.
    MinMax,
}

impl ViewKind {
    pub const ALL: [ViewKind; 2] = [ViewKind::Indexed, ViewKind::MinMax];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ViewKind::Indexed => "indexed (base 100)",
            ViewKind::MinMax => "min-max [0, 1]",
        }
    }

    /// File name of the exported artifact for this view.
    pub fn artifact_name(self) -> &'static str {
        match self {
            ViewKind::Indexed => "merged_data_normalized.csv",
            ViewKind::MinMax => "merged_data_minmax.csv",
        }
    }
}

/// File name of the merged (filled) dataset artifact.
pub const MERGED_ARTIFACT: &str = "merged_data.csv";

/// File name of the run manifest written next to the artifacts.
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Name of the date column in every raw file and artifact.
pub const DATE_COLUMN: &str = "DATE";

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). Directory paths live
/// here rather than in module-level statics so every stage receives its
/// configuration explicitly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Inclusive window start; its calendar month is the first grid entry.
    pub start: NaiveDate,
    /// Inclusive window end; its calendar month is the last grid entry.
    pub end: NaiveDate,
    /// Ordered series declarations; column order everywhere follows this.
    pub series: Vec<SeriesSpec>,
    /// Directory holding one raw CSV per series (fetch output, build input).
    pub raw_dir: PathBuf,
    /// Directory receiving the merged/view artifacts and the manifest.
    pub out_dir: PathBuf,
    /// Use the seeded synthetic source instead of the network.
    pub offline: bool,
    /// Seed for the synthetic source; ignored when online.
    pub sample_seed: u64,
    /// How many rows of the merged dataset to preview in the run summary.
    pub preview_rows: usize,
}

impl RunConfig {
    /// Reject configurations the pipeline must never start with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.start > self.end {
            return Err(crate::error::PanelError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.series.is_empty() {
            return Err(crate::error::PanelError::Config(
                "no series configured".to_string(),
            ));
        }
        for (i, spec) in self.series.iter().enumerate() {
            if self.series[..i].iter().any(|s| s.code == spec.code) {
                return Err(crate::error::PanelError::Config(format!(
                    "duplicate series code `{}`",
                    spec.code
                )));
            }
        }
        Ok(())
    }
}

/// The built-in FRED catalog, in dashboard column order.
///
/// Codes and labels follow the St. Louis Fed series registry; GDP and PCE
/// report quarterly, SP500 daily, the rest monthly.
pub fn default_catalog() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("UNRATE", "Unemployment Rate", Frequency::Monthly),
        SeriesSpec::new("CPIAUCSL", "Consumer Price Index", Frequency::Monthly),
        SeriesSpec::new("INDPRO", "Industrial Production", Frequency::Monthly),
        SeriesSpec::new("FEDFUNDS", "Federal Funds Rate", Frequency::Monthly),
        SeriesSpec::new("GDP", "Gross Domestic Product", Frequency::Quarterly),
        SeriesSpec::new("PCE", "Personal Consumption Expenditures", Frequency::Quarterly),
        SeriesSpec::new("SP500", "S&P 500 Index", Frequency::Daily),
    ]
}
