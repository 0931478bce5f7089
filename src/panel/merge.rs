//! Left-join normalized series onto the monthly grid and eliminate gaps.
//!
//! The grid decides row membership; each series only supplies values at
//! exact timestamp matches. The fill policy (forward-fill, then
//! backward-fill for the leading months before a series' first observation)
//! runs per column, never across columns. The result is a [`FilledTable`]
//! with no missing cells, the hard barrier between alignment and the view
//! transforms.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{MonthlySeries, SeriesSpec};
use crate::error::{PanelError, Result};
use crate::panel::grid::MonthlyGrid;

/// One fully-filled series column of the merged dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledColumn {
    pub spec: SeriesSpec,
    pub values: Vec<f64>,
}

/// The merged dataset after the fill pass: one row per grid month, one
/// column per series in declaration order, no missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledTable {
    pub months: Vec<NaiveDate>,
    pub columns: Vec<FilledColumn>,
}

impl FilledTable {
    pub fn row_count(&self) -> usize {
        self.months.len()
    }

    pub fn column(&self, code: &str) -> Option<&FilledColumn> {
        self.columns.iter().find(|c| c.spec.code == code)
    }
}

/// Join every normalized series onto the grid and apply the fill policy.
///
/// Column order follows the order of `series`, which the pipeline keeps in
/// declaration order. A column that joins to zero grid months means the
/// series contributed nothing inside the window; that surfaces as
/// [`PanelError::MissingSeriesData`], never as a silently missing cell.
pub fn merge_and_fill(grid: &MonthlyGrid, series: &[MonthlySeries]) -> Result<FilledTable> {
    let mut columns = Vec::with_capacity(series.len());

    for monthly in series {
        // Exact-timestamp lookup; the normalizer guarantees anchor-aligned,
        // deduplicated points, so a plain map per series suffices.
        let by_date: HashMap<NaiveDate, f64> = monthly.points.iter().copied().collect();

        let mut cells: Vec<Option<f64>> = grid
            .months()
            .iter()
            .map(|month| by_date.get(month).copied())
            .collect();

        forward_fill(&mut cells);
        backward_fill(&mut cells);

        let values: Vec<f64> = cells
            .into_iter()
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| PanelError::MissingSeriesData {
                code: monthly.spec.code.clone(),
            })?;

        columns.push(FilledColumn {
            spec: monthly.spec.clone(),
            values,
        });
    }

    Ok(FilledTable {
        months: grid.months().to_vec(),
        columns,
    })
}

/// Propagate the most recent non-missing value into subsequent missing cells.
pub fn forward_fill(cells: &mut [Option<f64>]) {
    let mut last = None;
    for cell in cells.iter_mut() {
        match *cell {
            Some(v) => last = Some(v),
            None => *cell = last,
        }
    }
}

/// Propagate the next non-missing value into preceding missing cells.
///
/// After [`forward_fill`] this only ever touches the head of a column, the
/// months before a series' first observation.
pub fn backward_fill(cells: &mut [Option<f64>]) {
    let mut next = None;
    for cell in cells.iter_mut().rev() {
        match *cell {
            Some(v) => next = Some(v),
            None => *cell = next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Frequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spec(code: &str) -> SeriesSpec {
        SeriesSpec::new(code, code, Frequency::Monthly)
    }

    fn monthly(code: &str, points: Vec<(NaiveDate, f64)>) -> MonthlySeries {
        MonthlySeries {
            spec: spec(code),
            points,
        }
    }

    #[test]
    fn forward_fill_propagates_last_value() {
        let mut cells = vec![Some(1.0), None, None, Some(4.0), None];
        forward_fill(&mut cells);
        assert_eq!(
            cells,
            vec![Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn backward_fill_only_touches_the_head_after_forward_fill() {
        let mut cells = vec![None, None, Some(3.0), None, Some(5.0)];
        forward_fill(&mut cells);
        backward_fill(&mut cells);
        assert_eq!(
            cells,
            vec![Some(3.0), Some(3.0), Some(3.0), Some(3.0), Some(5.0)]
        );
    }

    #[test]
    fn fill_is_idempotent() {
        let mut cells = vec![None, Some(2.0), None, Some(7.0), None];
        forward_fill(&mut cells);
        backward_fill(&mut cells);
        let once = cells.clone();

        forward_fill(&mut cells);
        backward_fill(&mut cells);
        assert_eq!(cells, once);
    }

    #[test]
    fn merge_leaves_no_gaps_and_keeps_declaration_order() {
        let grid = MonthlyGrid::build(date(2024, 1, 1), date(2024, 4, 1)).unwrap();
        let a = monthly("A", vec![(date(2024, 2, 1), 2.0), (date(2024, 4, 1), 4.0)]);
        let b = monthly("B", vec![(date(2024, 1, 1), 10.0)]);

        let table = merge_and_fill(&grid, &[a, b]).unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.columns[0].spec.code, "A");
        assert_eq!(table.columns[1].spec.code, "B");
        // Head backward-filled from the first observation, gaps forward-filled.
        assert_eq!(table.columns[0].values, vec![2.0, 2.0, 2.0, 4.0]);
        assert_eq!(table.columns[1].values, vec![10.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn series_outside_the_window_surfaces_as_missing_data() {
        let grid = MonthlyGrid::build(date(2024, 1, 1), date(2024, 3, 1)).unwrap();
        // All points fall before the grid; the join produces an empty column.
        let stale = monthly("OLD", vec![(date(2023, 6, 1), 1.0)]);

        let err = merge_and_fill(&grid, &[stale]).unwrap_err();
        match err {
            PanelError::MissingSeriesData { code } => assert_eq!(code, "OLD"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn merge_is_deterministic_for_identical_inputs() {
        let grid = MonthlyGrid::build(date(2024, 1, 1), date(2024, 6, 1)).unwrap();
        let series = vec![
            monthly("A", vec![(date(2024, 1, 1), 1.0), (date(2024, 5, 1), 5.0)]),
            monthly("B", vec![(date(2024, 3, 1), 30.0)]),
        ];

        let first = merge_and_fill(&grid, &series).unwrap();
        let second = merge_and_fill(&grid, &series).unwrap();
        assert_eq!(first, second);
    }
}
