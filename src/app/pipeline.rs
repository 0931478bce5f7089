//! Shared alignment pipeline used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! normalize (per series) -> grid -> merge + fill -> derived views
//!
//! This is pure compute over already-retrieved observations: no file or
//! network I/O happens here, so `econ build`, `econ run`, and the tests all
//! drive the exact same code.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{RawSeries, RunConfig, SeriesSpec, ViewKind};
use crate::error::{PanelError, Result};
use crate::panel::grid::MonthlyGrid;
use crate::panel::merge::{FilledTable, merge_and_fill};
use crate::panel::normalize::normalize_series;
use crate::panel::views::derive_view;

/// Per-series normalization stats for the run summary.
#[derive(Debug, Clone)]
pub struct SeriesReport {
    pub spec: SeriesSpec,
    pub raw_rows: usize,
    pub monthly_points: usize,
}

/// All computed outputs of a single run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub grid: MonthlyGrid,
    /// The merged dataset after the fill pass; valid even when a derived
    /// view cannot be computed.
    pub table: FilledTable,
    /// Each derived view, attempted independently.
    pub views: Vec<(ViewKind, Result<FilledTable>)>,
    pub reports: Vec<SeriesReport>,
    /// Optional series dropped because they had no usable data, with the
    /// error that dropped them.
    pub skipped: Vec<(SeriesSpec, PanelError)>,
}

impl PipelineOutput {
    /// The first view-level failure, if any; the merged table stays valid
    /// regardless.
    pub fn first_view_error(&self) -> Option<&PanelError> {
        self.views
            .iter()
            .find_map(|(_, result)| result.as_ref().err())
    }
}

/// Execute the full alignment pipeline over pre-retrieved raw series.
///
/// Normalization of distinct series has no cross-series dependency, so it
/// runs on the rayon pool; results are collected in declaration order, never
/// completion order, keeping column ordering deterministic.
///
/// A required series with no usable observations fails the run. An optional
/// one is dropped and reported instead.
pub fn run_pipeline(raw: &[RawSeries], config: &RunConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let grid = MonthlyGrid::build(config.start, config.end)?;
    debug!(months = grid.len(), "built monthly grid");

    let normalized: Vec<Result<_>> = raw.par_iter().map(normalize_series).collect();

    let mut monthly = Vec::with_capacity(raw.len());
    let mut reports = Vec::with_capacity(raw.len());
    let mut skipped = Vec::new();

    for (series, result) in raw.iter().zip(normalized) {
        match result {
            Ok(m) => {
                reports.push(SeriesReport {
                    spec: series.spec.clone(),
                    raw_rows: series.observations.len(),
                    monthly_points: m.points.len(),
                });
                monthly.push(m);
            }
            Err(err) if !series.spec.required => {
                warn!(code = %series.spec.code, "skipping optional series: {err}");
                skipped.push((series.spec.clone(), err));
            }
            Err(err) => return Err(err),
        }
    }

    if monthly.is_empty() {
        return Err(PanelError::Config(
            "every configured series was skipped; nothing to merge".to_string(),
        ));
    }

    let table = merge_and_fill(&grid, &monthly)?;

    let views = ViewKind::ALL
        .into_iter()
        .map(|kind| (kind, derive_view(kind, &table)))
        .collect();

    Ok(PipelineOutput {
        grid,
        table,
        views,
        reports,
        skipped,
    })
}
