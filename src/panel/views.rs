//! Derived comparison views over the filled merged dataset.
//!
//! Both transforms read the source table and build a fresh one; the months
//! column passes through untouched. A view either rescales every column or
//! fails naming all offending columns, so exported view artifacts always
//! carry the full configured column set. Division by zero is pre-checked;
//! no NaN or infinity is ever produced.

use crate::domain::ViewKind;
use crate::error::{PanelError, Result};
use crate::panel::merge::{FilledColumn, FilledTable};

/// Derive one view of the filled table.
pub fn derive_view(kind: ViewKind, table: &FilledTable) -> Result<FilledTable> {
    match kind {
        ViewKind::Indexed => indexed_view(table),
        ViewKind::MinMax => minmax_view(table),
    }
}

/// Rescale every column so its first row equals 100.
///
/// Fails with [`PanelError::DegenerateIndexBase`] when any column starts at
/// zero; the error lists every such column.
pub fn indexed_view(table: &FilledTable) -> Result<FilledTable> {
    let degenerate: Vec<String> = table
        .columns
        .iter()
        .filter(|c| c.values.first().is_some_and(|v| *v == 0.0))
        .map(|c| c.spec.code.clone())
        .collect();
    if !degenerate.is_empty() {
        return Err(PanelError::DegenerateIndexBase { codes: degenerate });
    }

    let columns = table
        .columns
        .iter()
        .map(|column| {
            // The filled table is never empty: the grid has at least one row.
            let base = column.values[0];
            FilledColumn {
                spec: column.spec.clone(),
                values: column.values.iter().map(|v| v / base * 100.0).collect(),
            }
        })
        .collect();

    Ok(FilledTable {
        months: table.months.clone(),
        columns,
    })
}

/// Rescale every column into `[0, 1]` by its own min and max.
///
/// Fails with [`PanelError::DegenerateRange`] when any column is constant
/// over the whole range; the error lists every such column.
pub fn minmax_view(table: &FilledTable) -> Result<FilledTable> {
    let bounds: Vec<(f64, f64)> = table.columns.iter().map(|c| column_bounds(c)).collect();

    let degenerate: Vec<String> = table
        .columns
        .iter()
        .zip(&bounds)
        .filter(|(_, (min, max))| min == max)
        .map(|(c, _)| c.spec.code.clone())
        .collect();
    if !degenerate.is_empty() {
        return Err(PanelError::DegenerateRange { codes: degenerate });
    }

    let columns = table
        .columns
        .iter()
        .zip(&bounds)
        .map(|(column, (min, max))| FilledColumn {
            spec: column.spec.clone(),
            values: column
                .values
                .iter()
                .map(|v| (v - min) / (max - min))
                .collect(),
        })
        .collect();

    Ok(FilledTable {
        months: table.months.clone(),
        columns,
    })
}

fn column_bounds(column: &FilledColumn) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in &column.values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, SeriesSpec};
    use chrono::NaiveDate;

    fn table(columns: Vec<(&str, Vec<f64>)>) -> FilledTable {
        let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let months = (0..rows)
            .map(|i| NaiveDate::from_ymd_opt(2024, i as u32 + 1, 1).unwrap())
            .collect();
        FilledTable {
            months,
            columns: columns
                .into_iter()
                .map(|(code, values)| FilledColumn {
                    spec: SeriesSpec::new(code, code, Frequency::Monthly),
                    values,
                })
                .collect(),
        }
    }

    #[test]
    fn indexed_view_starts_every_column_at_100() {
        let source = table(vec![("A", vec![2.0, 4.0, 6.0]), ("B", vec![50.0, 25.0, 75.0])]);
        let view = indexed_view(&source).unwrap();

        for column in &view.columns {
            assert!((column.values[0] - 100.0).abs() < 1e-12);
        }
        assert_eq!(view.columns[0].values, vec![100.0, 200.0, 300.0]);
        assert_eq!(view.columns[1].values, vec![100.0, 50.0, 150.0]);
        assert_eq!(view.months, source.months);
    }

    #[test]
    fn minmax_view_maps_extremes_to_exact_bounds() {
        let source = table(vec![("A", vec![3.0, 1.0, 5.0, 2.0])]);
        let view = minmax_view(&source).unwrap();

        let values = &view.columns[0].values;
        assert_eq!(values[1], 0.0);
        assert_eq!(values[2], 1.0);
        for &v in values {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn zero_base_fails_indexing_and_names_every_offender() {
        let source = table(vec![
            ("A", vec![0.0, 1.0]),
            ("B", vec![5.0, 6.0]),
            ("C", vec![0.0, 2.0]),
        ]);
        let err = indexed_view(&source).unwrap_err();
        match err {
            PanelError::DegenerateIndexBase { codes } => {
                assert_eq!(codes, vec!["A".to_string(), "C".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn constant_column_fails_minmax_scaling() {
        let source = table(vec![("FLAT", vec![7.0, 7.0, 7.0]), ("B", vec![1.0, 2.0, 3.0])]);
        let err = minmax_view(&source).unwrap_err();
        match err {
            PanelError::DegenerateRange { codes } => assert_eq!(codes, vec!["FLAT".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn views_do_not_mutate_the_source_table() {
        let source = table(vec![("A", vec![1.0, 2.0])]);
        let before = source.clone();
        let _ = indexed_view(&source).unwrap();
        let _ = minmax_view(&source).unwrap();
        assert_eq!(source, before);
    }

    #[test]
    fn view_kinds_dispatch_to_their_transform() {
        let source = table(vec![("A", vec![1.0, 2.0])]);
        let indexed = derive_view(ViewKind::Indexed, &source).unwrap();
        assert_eq!(indexed.columns[0].values, vec![100.0, 200.0]);
        let minmax = derive_view(ViewKind::MinMax, &source).unwrap();
        assert_eq!(minmax.columns[0].values, vec![0.0, 1.0]);
    }
}
