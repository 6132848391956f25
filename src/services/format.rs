// src/services/format.rs
use log::warn;
use serde::Serialize;

use crate::models::{Metric, Summary};

/// Rounds to a whole number and inserts `,` every three digits
/// (`20400.0` -> `"20,400"`).
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        warn!("Non-finite value {} rendered as 0", value);
        return "0".to_string();
    }

    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

pub fn format_amount(metric: Metric, value: f64) -> String {
    if metric.is_currency() {
        format!("${}", group_thousands(value))
    } else {
        group_thousands(value)
    }
}

/// `+15.0%`. The sign is always shown, zero included.
pub fn format_growth(value: f64) -> String {
    format!("{:+.1}%", value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub value: String,
    pub label: String,
}

/// The three Key Metrics regions as display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCards {
    pub total: SummaryCard,
    pub average: SummaryCard,
    pub growth: SummaryCard,
}

impl SummaryCards {
    pub fn new(metric: Metric, summary: &Summary) -> Self {
        SummaryCards {
            total: SummaryCard {
                value: format_amount(metric, summary.total),
                label: format!("Total {}", metric),
            },
            average: SummaryCard {
                value: format_amount(metric, summary.average),
                label: format!("Avg {}", metric),
            },
            growth: SummaryCard {
                value: format_growth(summary.growth_rate_percent),
                label: "Growth Rate".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(335.0), "335");
        assert_eq!(group_thousands(1700.0), "1,700");
        assert_eq!(group_thousands(20400.0), "20,400");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
        assert_eq!(group_thousands(-98765.0), "-98,765");
    }

    #[test]
    fn rounds_before_grouping() {
        assert_eq!(group_thousands(111.666), "112");
        assert_eq!(group_thousands(1054.1666), "1,054");
        assert_eq!(group_thousands(999.7), "1,000");
    }

    #[test]
    fn non_finite_renders_zero() {
        assert_eq!(group_thousands(f64::NAN), "0");
        assert_eq!(group_thousands(f64::INFINITY), "0");
    }

    #[test]
    fn currency_prefix_only_for_dollar_metrics() {
        assert_eq!(format_amount(Metric::Sales, 20400.0), "$20,400");
        assert_eq!(format_amount(Metric::Expenses, 1054.17), "$1,054");
        assert_eq!(format_amount(Metric::Customers, 1795.0), "1,795");
    }

    #[test]
    fn growth_has_sign_and_one_decimal() {
        assert_eq!(format_growth(15.0), "+15.0%");
        assert_eq!(format_growth(1.5), "+1.5%");
        assert_eq!(format_growth(0.0), "+0.0%");
        assert_eq!(format_growth(-2.5), "-2.5%");
    }

    #[test]
    fn cards_for_full_year_sales() {
        let summary = Summary { total: 20400.0, average: 1700.0, growth_rate_percent: 15.0 };
        let cards = SummaryCards::new(Metric::Sales, &summary);
        assert_eq!(
            cards,
            SummaryCards {
                total: SummaryCard { value: "$20,400".into(), label: "Total Sales".into() },
                average: SummaryCard { value: "$1,700".into(), label: "Avg Sales".into() },
                growth: SummaryCard { value: "+15.0%".into(), label: "Growth Rate".into() },
            }
        );
    }

    #[test]
    fn cards_for_customers_have_no_dollar_sign() {
        let summary = Summary { total: 335.0, average: 335.0 / 3.0, growth_rate_percent: 1.5 };
        let cards = SummaryCards::new(Metric::Customers, &summary);
        assert_eq!(cards.total.value, "335");
        assert_eq!(cards.average.value, "112");
        assert_eq!(cards.average.label, "Avg Customers");
        assert_eq!(cards.growth.value, "+1.5%");
    }
}
