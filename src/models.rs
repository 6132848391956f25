// src/models.rs
use chrono::Month;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::services::filter::FilterError;

/// Three-letter label used on chart axes and slider ticks ("Jan".."Dec").
pub fn month_label(month: Month) -> &'static str {
    &month.name()[..3]
}

fn serialize_month<S: Serializer>(month: &Month, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(month_label(*month))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthRecord {
    #[serde(serialize_with = "serialize_month")]
    pub month: Month,
    pub sales: f64,
    pub expenses: f64,
    pub customers: u32,
}

/// The quantity plotted on the line chart and summarised in the key metrics.
/// Deserializes through `FromStr`, so JSON bodies and query strings accept the
/// same spellings as the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Metric {
    #[default]
    Sales,
    Expenses,
    Customers,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Sales, Metric::Expenses, Metric::Customers];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Sales => "Sales",
            Metric::Expenses => "Expenses",
            Metric::Customers => "Customers",
        }
    }

    pub fn value_of(&self, record: &MonthRecord) -> f64 {
        match self {
            Metric::Sales => record.sales,
            Metric::Expenses => record.expenses,
            Metric::Customers => f64::from(record.customers),
        }
    }

    /// Dollar metrics get a `$` prefix when rendered; Customers is a head count.
    pub fn is_currency(&self) -> bool {
        !matches!(self, Metric::Customers)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnknownMetric(s.to_string()))
    }
}

impl TryFrom<String> for Metric {
    type Error = FilterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub month: &'static str,
    pub value: f64,
}

/// Per-metric means over the selected range. Customers is stored scaled by 10
/// so its bar sits next to the dollar metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BarAverages {
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Expenses")]
    pub expenses: f64,
    #[serde(rename = "Customers")]
    pub customers: f64,
}

impl BarAverages {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sales => self.sales,
            Metric::Expenses => self.expenses,
            Metric::Customers => self.customers,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: f64,
    pub average: f64,
    pub growth_rate_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub line_series: Vec<LinePoint>,
    pub bar_averages: BarAverages,
    pub summary: Summary,
}
