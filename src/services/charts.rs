// src/services/charts.rs
use plotly::common::{Marker, Mode, Title};
use plotly::layout::Axis;
use plotly::{Bar, Layout, Scatter};
use serde::Serialize;
use serde_json::Value;

use crate::models::{BarAverages, LinePoint, Metric};

const CHART_HEIGHT: usize = 450;

/// A plotly.js figure: traces plus layout, ready for `Plotly.react`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

fn metric_color(metric: Metric) -> &'static str {
    match metric {
        Metric::Sales => "#636EFA",
        Metric::Expenses => "#EF553B",
        Metric::Customers => "#00CC96",
    }
}

/// "Monthly Trend" card: one point per month in range.
pub fn line_figure(metric: Metric, series: &[LinePoint]) -> Result<Figure, serde_json::Error> {
    let months: Vec<String> = series.iter().map(|p| p.month.to_string()).collect();
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();

    let trace = Scatter::new(months, values)
        .mode(Mode::LinesMarkers)
        .name(metric.name())
        .marker(Marker::new().color(metric_color(metric)));

    let title = format!("Monthly {}", metric);
    let layout = Layout::new()
        .title(Title::with_text(&title))
        .x_axis(Axis::new().title("Month"))
        .y_axis(Axis::new().title(metric.name()))
        .height(CHART_HEIGHT);

    Ok(Figure {
        data: vec![serde_json::to_value(&trace)?],
        layout: serde_json::to_value(&layout)?,
    })
}

/// "Comparison" card: one colored bar per metric.
pub fn bar_figure(averages: &BarAverages) -> Result<Figure, serde_json::Error> {
    let data = averages
        .iter()
        .map(|(metric, average)| {
            let trace = Bar::new(vec![metric.name().to_string()], vec![average])
                .name(metric.name())
                .marker(Marker::new().color(metric_color(metric)));
            serde_json::to_value(&trace)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let layout = Layout::new()
        .title("Average Metrics")
        .x_axis(Axis::new().title("Metric"))
        .y_axis(Axis::new().title("Average"))
        .height(CHART_HEIGHT);

    Ok(Figure {
        data,
        layout: serde_json::to_value(&layout)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Vec<LinePoint> {
        vec![
            LinePoint { month: "Jan", value: 100.0 },
            LinePoint { month: "Feb", value: 120.0 },
            LinePoint { month: "Mar", value: 115.0 },
        ]
    }

    #[test]
    fn line_figure_has_one_trace_with_markers() {
        let figure = line_figure(Metric::Customers, &series()).unwrap();
        assert_eq!(figure.data.len(), 1);
        let trace = &figure.data[0];
        assert_eq!(trace["type"], "scatter");
        assert_eq!(trace["mode"], "lines+markers");
        assert_eq!(trace["x"], serde_json::json!(["Jan", "Feb", "Mar"]));
        assert_eq!(trace["y"], serde_json::json!([100.0, 120.0, 115.0]));
    }

    #[test]
    fn line_figure_title_names_metric() {
        let figure = line_figure(Metric::Sales, &series()).unwrap();
        assert_eq!(figure.layout["title"]["text"], "Monthly Sales");
        assert_eq!(figure.layout["xaxis"]["title"]["text"], "Month");
        assert_eq!(figure.layout["yaxis"]["title"]["text"], "Sales");
    }

    #[test]
    fn bar_figure_has_trace_per_metric() {
        let averages = BarAverages { sales: 1700.0, expenses: 1054.0, customers: 1495.0 };
        let figure = bar_figure(&averages).unwrap();
        let names: Vec<_> = figure.data.iter().map(|t| t["name"].clone()).collect();
        assert_eq!(names, vec!["Sales", "Expenses", "Customers"]);
        assert_eq!(figure.data[2]["y"], serde_json::json!([1495.0]));
        assert_eq!(figure.data[0]["type"], "bar");
        assert_eq!(figure.layout["title"]["text"], "Average Metrics");
    }
}
