// src/services/calculations.rs
use log::{debug, warn};

use crate::data::Dataset;
use crate::models::{BarAverages, DerivedView, LinePoint, Metric, MonthRecord, Summary, month_label};
use crate::services::filter::{filter_range, FilterState};

/// Customers bar is drawn at ten times its mean so it is visible next to the
/// dollar metrics.
pub const CUSTOMER_BAR_SCALE: f64 = 10.0;

/// Multiplier applied to the fractional change between first and last month.
/// This is 10, not 100: the "Growth Rate" card has always shown this value.
pub const GROWTH_MULTIPLIER: f64 = 10.0;

fn calculate_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn calculate_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn metric_values(records: &[MonthRecord], metric: Metric) -> Vec<f64> {
    records.iter().map(|r| metric.value_of(r)).collect()
}

pub fn calculate_growth_rate(first: f64, last: f64) -> f64 {
    if first > 0.0 {
        ((last - first) / first) * GROWTH_MULTIPLIER
    } else {
        0.0
    }
}

pub fn build_line_series(records: &[MonthRecord], metric: Metric) -> Vec<LinePoint> {
    records
        .iter()
        .map(|r| LinePoint {
            month: month_label(r.month),
            value: metric.value_of(r),
        })
        .collect()
}

pub fn build_bar_averages(records: &[MonthRecord]) -> BarAverages {
    if records.is_empty() {
        warn!("No records in range, bar averages default to 0");
    }
    BarAverages {
        sales: calculate_average(&metric_values(records, Metric::Sales)),
        expenses: calculate_average(&metric_values(records, Metric::Expenses)),
        customers: calculate_average(&metric_values(records, Metric::Customers)) * CUSTOMER_BAR_SCALE,
    }
}

pub fn build_summary(records: &[MonthRecord], metric: Metric) -> Summary {
    let values = metric_values(records, metric);
    let (first, last) = match (values.first(), values.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            warn!("No {} values in range, summary defaults to 0", metric);
            return Summary::default();
        }
    };

    Summary {
        total: calculate_sum(&values),
        average: calculate_average(&values),
        growth_rate_percent: calculate_growth_rate(first, last),
    }
}

/// Recomputes every chart and summary output for one filter state. Pure:
/// the same dataset and filter always give the same view.
pub fn derive_view(dataset: &Dataset, filter: &FilterState) -> DerivedView {
    let records = filter_range(dataset, filter.range);
    debug!(
        "Deriving view for {} over months {}..={} ({} records)",
        filter.metric,
        filter.range.start(),
        filter.range.end(),
        records.len()
    );

    DerivedView {
        line_series: build_line_series(records, filter.metric),
        bar_averages: build_bar_averages(records),
        summary: build_summary(records, filter.metric),
    }
}
