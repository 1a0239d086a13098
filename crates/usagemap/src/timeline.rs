//! Interval rows for the timeline strip.
//!
//! The rows are carried as produced by the data source; nothing here
//! interprets labels or merges intervals.

use serde::{Deserialize, Serialize};

/// Milliseconds in one hour.
const HOUR_MS: i64 = 3_600_000;

/// Widest span that still gets hour ticks (31 days).
const MAX_TICK_SPAN_MS: i64 = 31 * 24 * HOUR_MS;

/// A closed time range in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Start, Unix milliseconds.
    pub starting_time: i64,
    /// End, Unix milliseconds.
    pub ending_time: i64,
}

/// One labelled row of intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRow {
    /// Row label (a hostname, or a spacer row).
    pub label: String,
    /// Intervals in the row.
    #[serde(default)]
    pub times: Vec<Interval>,
}

/// All rows for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalSet(Vec<IntervalRow>);

impl IntervalSet {
    /// Wrap rows.
    #[must_use]
    pub const fn new(rows: Vec<IntervalRow>) -> Self {
        Self(rows)
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[IntervalRow] {
        &self.0
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True without rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<IntervalRow>> for IntervalSet {
    fn from(rows: Vec<IntervalRow>) -> Self {
        Self(rows)
    }
}

/// The timeline strip drawn under the treemap.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    intervals: IntervalSet,
    width: f64,
}

impl Timeline {
    /// Strip of `width` pixels over `intervals`.
    #[must_use]
    pub const fn new(intervals: IntervalSet, width: f64) -> Self {
        Self { intervals, width }
    }

    /// The rows.
    #[must_use]
    pub const fn intervals(&self) -> &IntervalSet {
        &self.intervals
    }

    /// Strip width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Earliest start and latest end across all rows.
    #[must_use]
    pub fn span(&self) -> Option<(i64, i64)> {
        let times = self.intervals.rows().iter().flat_map(|row| row.times.iter());
        let start = times.clone().map(|i| i.starting_time).min()?;
        let end = times.map(|i| i.ending_time).max()?;
        Some((start, end))
    }

    /// Whole-hour tick positions (Unix milliseconds) inside [`span`](Self::span).
    ///
    /// Spans wider than 31 days get no ticks.
    #[must_use]
    pub fn hour_ticks(&self) -> Vec<i64> {
        let Some((start, end)) = self.span() else {
            return Vec::new();
        };
        match end.checked_sub(start) {
            Some(width) if width <= MAX_TICK_SPAN_MS => {}
            _ => return Vec::new(),
        }
        let rem = start.rem_euclid(HOUR_MS);
        let first = if rem == 0 {
            Some(start)
        } else {
            start.checked_add(HOUR_MS - rem)
        };
        std::iter::successors(first, |t| t.checked_add(HOUR_MS))
            .take_while(|&t| t <= end)
            .collect()
    }
}
