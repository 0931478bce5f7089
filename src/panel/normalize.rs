//! Series normalization onto the monthly anchor convention.
//!
//! Whatever the native cadence, the output is one value per calendar month,
//! timestamped at the month anchor, strictly increasing. Months the series
//! never reported stay absent; the merger's fill policy owns those.

use std::collections::BTreeMap;

use crate::domain::{Frequency, MonthlySeries, RawSeries};
use crate::error::{PanelError, Result};
use crate::panel::grid::month_anchor;

/// Reduce one raw series to a month-anchored monthly series.
///
/// Sub-monthly cadence keeps the last non-missing value within each month
/// (the final trading/reporting day stands for the month). Monthly and
/// quarterly series keep their values with timestamps snapped to the anchor;
/// should two observations land in one month, the later one wins, matching
/// the sub-monthly rule.
///
/// A series that contributes no usable observation at all is an error, not
/// an empty output: the caller decides whether that fails the run.
pub fn normalize_series(raw: &RawSeries) -> Result<MonthlySeries> {
    // BTreeMap keyed by month anchor gives dedup and ascending order in one
    // pass; later observations overwrite earlier ones within a month because
    // raw observations are sorted ascending.
    let mut by_month: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();

    for obs in &raw.observations {
        let Some(value) = obs.value else { continue };
        by_month.insert(month_anchor(obs.date), value);
    }

    if by_month.is_empty() {
        return Err(PanelError::MissingSeriesData {
            code: raw.spec.code.clone(),
        });
    }

    Ok(MonthlySeries {
        spec: raw.spec.clone(),
        points: by_month.into_iter().collect(),
    })
}

/// Expected anchored months per year for a native frequency, used only for
/// reporting (a quarterly series legitimately yields four points a year).
pub fn expected_points_per_year(frequency: Frequency) -> u32 {
    match frequency {
        Frequency::Daily | Frequency::Monthly => 12,
        Frequency::Quarterly => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, SeriesSpec};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_spec() -> SeriesSpec {
        SeriesSpec::new("SP500", "S&P 500 Index", Frequency::Daily)
    }

    #[test]
    fn daily_series_keeps_last_value_of_each_month() {
        let raw = RawSeries::new(
            daily_spec(),
            vec![
                Observation::new(date(2024, 1, 2), Some(10.0)),
                Observation::new(date(2024, 1, 17), Some(11.0)),
                Observation::new(date(2024, 1, 31), Some(12.0)),
                Observation::new(date(2024, 2, 1), Some(20.0)),
                Observation::new(date(2024, 2, 28), Some(21.0)),
            ],
        );

        let monthly = normalize_series(&raw).unwrap();
        assert_eq!(
            monthly.points,
            vec![(date(2024, 1, 1), 12.0), (date(2024, 2, 1), 21.0)]
        );
    }

    #[test]
    fn trailing_missing_values_do_not_mask_the_month() {
        // Last calendar observation of January is a holiday placeholder; the
        // month's representative value is the last *non-missing* one.
        let raw = RawSeries::new(
            daily_spec(),
            vec![
                Observation::new(date(2024, 1, 30), Some(12.5)),
                Observation::new(date(2024, 1, 31), None),
            ],
        );

        let monthly = normalize_series(&raw).unwrap();
        assert_eq!(monthly.points, vec![(date(2024, 1, 1), 12.5)]);
    }

    #[test]
    fn quarterly_series_snaps_to_month_anchor_and_leaves_gaps() {
        let spec = SeriesSpec::new("GDP", "Gross Domestic Product", Frequency::Quarterly);
        let raw = RawSeries::new(
            spec,
            vec![
                Observation::new(date(2024, 1, 1), Some(100.0)),
                Observation::new(date(2024, 4, 1), Some(101.0)),
                Observation::new(date(2024, 7, 1), Some(102.0)),
            ],
        );

        let monthly = normalize_series(&raw).unwrap();
        assert_eq!(monthly.points.len(), 3);
        assert_eq!(monthly.points[0], (date(2024, 1, 1), 100.0));
        assert_eq!(monthly.points[1], (date(2024, 4, 1), 101.0));
        // The intervening months are simply absent here; the merger fills them.
        for pair in monthly.points.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[test]
    fn monthly_series_with_mid_month_dates_is_anchored() {
        let spec = SeriesSpec::new("UNRATE", "Unemployment Rate", Frequency::Monthly);
        let raw = RawSeries::new(
            spec,
            vec![
                Observation::new(date(2024, 1, 15), Some(3.7)),
                Observation::new(date(2024, 2, 15), Some(3.9)),
            ],
        );

        let monthly = normalize_series(&raw).unwrap();
        assert_eq!(
            monthly.points,
            vec![(date(2024, 1, 1), 3.7), (date(2024, 2, 1), 3.9)]
        );
    }

    #[test]
    fn all_missing_series_is_an_error_naming_the_code() {
        let raw = RawSeries::new(
            daily_spec(),
            vec![
                Observation::new(date(2024, 1, 2), None),
                Observation::new(date(2024, 1, 3), None),
            ],
        );

        let err = normalize_series(&raw).unwrap_err();
        match err {
            PanelError::MissingSeriesData { code } => assert_eq!(code, "SP500"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_observation_list_is_an_error() {
        let raw = RawSeries::new(daily_spec(), Vec::new());
        assert!(normalize_series(&raw).is_err());
    }
}
