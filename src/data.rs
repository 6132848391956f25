// src/data.rs
use chrono::Month;
use serde::Serialize;
use std::fmt;
use std::iter;

use crate::models::{month_label, MonthRecord};
use crate::services::filter::MonthRange;

pub const MONTHS_PER_YEAR: usize = 12;

const SALES: [f64; MONTHS_PER_YEAR] = [
    1000.0, 1200.0, 900.0, 1500.0, 1800.0, 1700.0, 1600.0, 2000.0, 2200.0, 1900.0, 2100.0, 2500.0,
];
const EXPENSES: [f64; MONTHS_PER_YEAR] = [
    800.0, 850.0, 750.0, 950.0, 1000.0, 1100.0, 1200.0, 1300.0, 1400.0, 1200.0, 1100.0, 1000.0,
];
const CUSTOMERS: [u32; MONTHS_PER_YEAR] = [100, 120, 115, 130, 140, 150, 160, 170, 180, 175, 165, 190];

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    WrongLength(usize),
    OutOfOrder { index: usize, found: Month },
    InvalidValue { month: Month, field: &'static str },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatasetError::WrongLength(len) => {
                write!(f, "dataset must hold {} monthly records, got {}", MONTHS_PER_YEAR, len)
            }
            DatasetError::OutOfOrder { index, found } => {
                write!(f, "record {} is {}, expected calendar order", index, month_label(*found))
            }
            DatasetError::InvalidValue { month, field } => {
                write!(f, "{} for {} must be a non-negative number", field, month_label(*month))
            }
        }
    }
}

impl std::error::Error for DatasetError {}

fn calendar() -> impl Iterator<Item = Month> {
    iter::successors(Some(Month::January), |m| Some(m.succ())).take(MONTHS_PER_YEAR)
}

/// Twelve monthly records in calendar order. Immutable once built; handlers
/// share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<MonthRecord>,
}

impl Dataset {
    /// The fixed table the dashboard ships with, checked like any other input.
    pub fn builtin() -> Result<Self, DatasetError> {
        let records = calendar()
            .enumerate()
            .map(|(i, month)| MonthRecord {
                month,
                sales: SALES[i],
                expenses: EXPENSES[i],
                customers: CUSTOMERS[i],
            })
            .collect();
        Dataset::from_records(records)
    }

    pub fn from_records(records: Vec<MonthRecord>) -> Result<Self, DatasetError> {
        if records.len() != MONTHS_PER_YEAR {
            return Err(DatasetError::WrongLength(records.len()));
        }
        for (index, (record, expected)) in records.iter().zip(calendar()).enumerate() {
            if record.month != expected {
                return Err(DatasetError::OutOfOrder { index, found: record.month });
            }
            for (field, value) in [("Sales", record.sales), ("Expenses", record.expenses)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(DatasetError::InvalidValue { month: record.month, field });
                }
            }
        }
        Ok(Dataset { records })
    }

    pub fn records(&self) -> &[MonthRecord] {
        &self.records
    }

    pub fn slice(&self, range: MonthRange) -> &[MonthRecord] {
        &self.records[range.start()..=range.end()]
    }

    pub fn month_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.records.iter().map(|r| month_label(r.month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_twelve_months_in_order() {
        let dataset = Dataset::builtin().unwrap();
        assert_eq!(dataset.records().len(), MONTHS_PER_YEAR);
        let labels: Vec<_> = dataset.month_labels().collect();
        assert_eq!(
            labels,
            vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
        );
        assert_eq!(dataset.records()[0].sales, 1000.0);
        assert_eq!(dataset.records()[11].customers, 190);
    }

    #[test]
    fn builtin_round_trips_through_validation() {
        let dataset = Dataset::builtin().unwrap();
        let rebuilt = Dataset::from_records(dataset.records().to_vec()).unwrap();
        assert_eq!(rebuilt, dataset);
    }

    #[test]
    fn rejects_short_dataset() {
        let mut records = Dataset::builtin().unwrap().records().to_vec();
        records.pop();
        assert_eq!(Dataset::from_records(records), Err(DatasetError::WrongLength(11)));
    }

    #[test]
    fn rejects_swapped_months() {
        let mut records = Dataset::builtin().unwrap().records().to_vec();
        records.swap(3, 4);
        assert_eq!(
            Dataset::from_records(records),
            Err(DatasetError::OutOfOrder { index: 3, found: Month::May })
        );
    }

    #[test]
    fn rejects_negative_expenses() {
        let mut records = Dataset::builtin().unwrap().records().to_vec();
        records[7].expenses = -1.0;
        let err = Dataset::from_records(records).unwrap_err();
        assert_eq!(err.to_string(), "Expenses for Aug must be a non-negative number");
    }

    #[test]
    fn slice_is_inclusive() {
        let dataset = Dataset::builtin().unwrap();
        let range = MonthRange::new(2, 4).unwrap();
        let months: Vec<_> = dataset.slice(range).iter().map(|r| month_label(r.month)).collect();
        assert_eq!(months, vec!["Mar", "Apr", "May"]);
    }
}
