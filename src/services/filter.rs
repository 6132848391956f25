// src/services/filter.rs
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::{Dataset, MONTHS_PER_YEAR};
use crate::models::{Metric, MonthRecord};

const LAST_MONTH: usize = MONTHS_PER_YEAR - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    StartAfterEnd { start: usize, end: usize },
    OutOfBounds(usize),
    UnknownMetric(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FilterError::StartAfterEnd { start, end } => {
                write!(f, "range start {} is after range end {}", start, end)
            }
            FilterError::OutOfBounds(index) => {
                write!(f, "month index {} is outside 0..={}", index, LAST_MONTH)
            }
            FilterError::UnknownMetric(name) => write!(f, "unknown metric '{}'", name),
        }
    }
}

impl std::error::Error for FilterError {}

/// Inclusive pair of month indices, always `start <= end <= 11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[usize; 2]", into = "[usize; 2]")]
pub struct MonthRange {
    start: usize,
    end: usize,
}

impl MonthRange {
    pub const FULL_YEAR: MonthRange = MonthRange { start: 0, end: LAST_MONTH };

    pub fn new(start: usize, end: usize) -> Result<Self, FilterError> {
        if end > LAST_MONTH {
            return Err(FilterError::OutOfBounds(end));
        }
        if start > end {
            return Err(FilterError::StartAfterEnd { start, end });
        }
        Ok(MonthRange { start, end })
    }

    /// What the range slider does with raw handle positions: pin both into
    /// the year and put them back in order.
    pub fn clamped(start: usize, end: usize) -> Self {
        let (a, b) = (start.min(LAST_MONTH), end.min(LAST_MONTH));
        MonthRange { start: a.min(b), end: a.max(b) }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn month_count(&self) -> usize {
        self.end - self.start + 1
    }
}

impl Default for MonthRange {
    fn default() -> Self {
        MonthRange::FULL_YEAR
    }
}

impl TryFrom<[usize; 2]> for MonthRange {
    type Error = FilterError;

    fn try_from([start, end]: [usize; 2]) -> Result<Self, Self::Error> {
        MonthRange::new(start, end)
    }
}

impl From<MonthRange> for [usize; 2] {
    fn from(range: MonthRange) -> Self {
        [range.start, range.end]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub metric: Metric,
    pub range: MonthRange,
}

pub fn filter_range(dataset: &Dataset, range: MonthRange) -> &[MonthRecord] {
    dataset.slice(range)
}

/// Range filter for unvalidated indices. An inverted or out-of-year pair
/// yields an empty slice instead of panicking; `end` past the data is cut.
pub fn filter_indices(records: &[MonthRecord], start: usize, end: usize) -> &[MonthRecord] {
    if start > end || start >= records.len() {
        warn!("Empty month range requested: start={}, end={}", start, end);
        return &[];
    }
    let end = end.min(records.len() - 1);
    &records[start..=end]
}
