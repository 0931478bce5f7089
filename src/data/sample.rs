//! Seeded synthetic series generation for offline runs.
//!
//! Generates raw observation sequences at each series' native cadence so the
//! full pipeline (normalize, merge, fill, views, export) can be exercised
//! without a network or an API key. Same seed, same series, same bytes all
//! the way to the exported artifacts.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Frequency, Observation, RawSeries, SeriesSpec};
use crate::error::{PanelError, Result};
use crate::panel::grid::{month_anchor, next_month};

/// Probability that a daily observation is a holiday-style missing value.
const DAILY_MISSING_PROB: f64 = 0.02;

/// Generate raw series for every declaration, in declaration order.
pub fn generate_all(
    series: &[SeriesSpec],
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
) -> Result<Vec<RawSeries>> {
    if start > end {
        return Err(PanelError::InvalidDateRange { start, end });
    }

    series
        .iter()
        .map(|spec| generate_raw_series(spec, start, end, seed))
        .collect()
}

/// Generate one raw series over `[start, end]` at its native cadence.
///
/// Values follow a seeded random walk around a level typical for the series
/// (unemployment in single digits, an equity index in the thousands), floored
/// away from zero so every derived view stays well-defined. Daily series skip
/// weekends and occasionally report a missing value, matching what the real
/// source does on holidays.
pub fn generate_raw_series(
    spec: &SeriesSpec,
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
) -> Result<RawSeries> {
    let mut rng = StdRng::seed_from_u64(series_seed(spec, start, end, seed));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| PanelError::Config(format!("noise distribution error: {e}")))?;

    let (mut level, sigma) = walk_parameters(spec);
    let floor = level * 0.1;

    let mut observations = Vec::new();
    for date in cadence_dates(spec.frequency, start, end) {
        level = (level + sigma * normal.sample(&mut rng)).max(floor);

        let value = if spec.frequency == Frequency::Daily && rng.r#gen::<f64>() < DAILY_MISSING_PROB
        {
            None
        } else {
            Some(level)
        };

        observations.push(Observation::new(date, value));
    }

    Ok(RawSeries::new(spec.clone(), observations))
}

/// Calendar dates at the native cadence: weekdays for daily series, month
/// anchors for monthly, quarter-start month anchors for quarterly.
fn cadence_dates(frequency: Frequency, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    match frequency {
        Frequency::Daily => {
            let mut cursor = start;
            while cursor <= end {
                if !matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
                    dates.push(cursor);
                }
                cursor += Duration::days(1);
            }
        }
        Frequency::Monthly => {
            let mut cursor = month_anchor(start);
            if cursor < start {
                cursor = next_month(cursor);
            }
            while cursor <= end {
                dates.push(cursor);
                cursor = next_month(cursor);
            }
        }
        Frequency::Quarterly => {
            let mut cursor = month_anchor(start);
            if cursor < start {
                cursor = next_month(cursor);
            }
            while cursor <= end {
                if matches!(cursor.month(), 1 | 4 | 7 | 10) {
                    dates.push(cursor);
                }
                cursor = next_month(cursor);
            }
        }
    }
    dates
}

/// Starting level and per-step noise scale for the walk.
///
/// Known catalog codes get levels in their real-world ballpark; anything
/// else falls back to a frequency-typical scale.
fn walk_parameters(spec: &SeriesSpec) -> (f64, f64) {
    match spec.code.as_str() {
        "UNRATE" => (5.0, 0.15),
        "CPIAUCSL" => (240.0, 0.8),
        "INDPRO" => (100.0, 0.7),
        "FEDFUNDS" => (1.5, 0.1),
        "GDP" => (18_000.0, 150.0),
        "PCE" => (12_000.0, 100.0),
        "SP500" => (2_000.0, 15.0),
        _ => match spec.frequency {
            Frequency::Daily => (1_000.0, 8.0),
            Frequency::Monthly => (100.0, 1.0),
            Frequency::Quarterly => (10_000.0, 80.0),
        },
    }
}

/// Per-series seed: the run seed mixed with the series identity and window,
/// so distinct series walk independently while the whole run stays
/// reproducible.
fn series_seed(spec: &SeriesSpec, start: NaiveDate, end: NaiveDate, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    spec.code.hash(&mut hasher);
    start.hash(&mut hasher);
    end.hash(&mut hasher);
    hasher.finish()
}
