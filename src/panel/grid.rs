//! The canonical monthly date spine.
//!
//! Every series is joined against this grid by exact timestamp, so the grid
//! and the normalizer must agree on one anchor convention: the first day of
//! the calendar month. The grid is computed once per run and never mutated.

use chrono::{Datelike, NaiveDate};

use crate::error::{PanelError, Result};

/// Ordered month-start timestamps spanning a closed window.
///
/// One entry per calendar month between the window bounds (inclusive of the
/// months both bounds fall in), strictly increasing, no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyGrid {
    months: Vec<NaiveDate>,
}

impl MonthlyGrid {
    /// Build the spine for `[start, end]`.
    ///
    /// Mid-month bounds are snapped to their month's anchor, so the bound
    /// months are always included. `start` after `end` is rejected before
    /// any processing.
    pub fn build(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(PanelError::InvalidDateRange { start, end });
        }

        let last = month_anchor(end);
        let mut months = Vec::new();
        let mut cursor = month_anchor(start);
        while cursor <= last {
            months.push(cursor);
            cursor = next_month(cursor);
        }

        Ok(Self { months })
    }

    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.months.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.months.last().copied()
    }
}

/// Snap a date to its month's canonical anchor (the first of the month).
pub fn month_anchor(date: NaiveDate) -> NaiveDate {
    // The first of the month always exists.
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// The anchor of the calendar month after the given anchor.
pub fn next_month(anchor: NaiveDate) -> NaiveDate {
    let (year, month) = if anchor.month() == 12 {
        (anchor.year() + 1, 1)
    } else {
        (anchor.year(), anchor.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}
