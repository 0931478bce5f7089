//! Error kinds for the whole pipeline.
//!
//! Every failure surfaces as a [`PanelError`] so that `main` can map it to a
//! stable process exit code:
//!
//! - `2` — usage, configuration, or local file problems
//! - `3` — a configured series (or a derived view) has no usable data
//! - `4` — retrieval or other external failures

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    /// Start bound falls after the end bound; rejected before any processing.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A configured series contributed zero usable observations in the
    /// window. Also raised when a merged column is still empty after the
    /// fill pass, which can only happen for the same reason.
    #[error("series `{code}` has no usable observations in the requested window")]
    MissingSeriesData { code: String },

    /// The indexed view is undefined: the first filled value is zero for
    /// the named columns, so rescaling to a base of 100 would divide by zero.
    #[error("cannot index to 100: first filled value is zero for {}", .codes.join(", "))]
    DegenerateIndexBase { codes: Vec<String> },

    /// The min-max view is undefined: the named columns are constant over
    /// the whole range (max equals min).
    #[error("cannot min-max scale: constant over the range for {}", .codes.join(", "))]
    DegenerateRange { codes: Vec<String> },

    /// A configuration value is missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A local file could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A local file could not be created or written.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A raw series CSV is structurally unusable (bad header, no rows).
    #[error("unusable CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Retrieval from the remote source failed for a series.
    #[error("retrieval failed for `{code}`: {message}")]
    Fetch { code: String, message: String },

    /// The run manifest could not be serialized.
    #[error("failed to encode run manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl PanelError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            PanelError::InvalidDateRange { .. }
            | PanelError::Config(_)
            | PanelError::FileRead { .. }
            | PanelError::FileWrite { .. }
            | PanelError::Csv { .. } => 2,
            PanelError::MissingSeriesData { .. }
            | PanelError::DegenerateIndexBase { .. }
            | PanelError::DegenerateRange { .. } => 3,
            PanelError::Fetch { .. } | PanelError::Manifest(_) => 4,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        let start = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        assert_eq!(PanelError::InvalidDateRange { start, end }.exit_code(), 2);
        assert_eq!(
            PanelError::MissingSeriesData {
                code: "GDP".to_string()
            }
            .exit_code(),
            3
        );
        assert_eq!(
            PanelError::Fetch {
                code: "UNRATE".to_string(),
                message: "timeout".to_string()
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn degenerate_errors_name_every_column() {
        let err = PanelError::DegenerateIndexBase {
            codes: vec!["GDP".to_string(), "PCE".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("GDP, PCE"));

        let err = PanelError::DegenerateRange {
            codes: vec!["FEDFUNDS".to_string()],
        };
        assert!(err.to_string().contains("FEDFUNDS"));
    }

    #[test]
    fn missing_series_names_the_code() {
        let err = PanelError::MissingSeriesData {
            code: "SP500".to_string(),
        };
        assert!(err.to_string().contains("`SP500`"));
    }
}
