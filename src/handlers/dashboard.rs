// src/handlers/dashboard.rs
use log::{error, info};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::sync::Arc;
use warp::Rejection;

use super::error::ApiError;
use super::view::ViewPayload;
use crate::models::Metric;
use crate::services::filter::FilterState;
use crate::services::store::DashboardStore;

const BOOTSTRAP_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/bootstrap/5.3.0/css/bootstrap.min.css";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const DASHBOARD_SCRIPT: &str = r#"
const MONTHS = JSON.parse(document.getElementById('month-labels').textContent);

function render(payload) {
    Plotly.react('line-chart', payload.line_figure.data, payload.line_figure.layout);
    Plotly.react('bar-chart', payload.bar_figure.data, payload.bar_figure.layout);
    for (const key of ['total', 'average', 'growth']) {
        const region = document.getElementById('card-' + key);
        region.querySelector('h3').textContent = payload.cards[key].value;
        region.querySelector('p').textContent = payload.cards[key].label;
    }
    const [start, end] = payload.filter.range;
    document.getElementById('metric-dropdown').value = payload.filter.metric;
    document.getElementById('range-start').value = start;
    document.getElementById('range-end').value = end;
    document.getElementById('range-label').textContent = MONTHS[start] + ' - ' + MONTHS[end];
}

async function pushFilter() {
    let start = Number(document.getElementById('range-start').value);
    let end = Number(document.getElementById('range-end').value);
    if (start > end) {
        [start, end] = [end, start];
    }
    const response = await fetch('/api/v1/filter', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
            metric: document.getElementById('metric-dropdown').value,
            range: [start, end],
        }),
    });
    if (response.ok) {
        render(await response.json());
    }
}

document.addEventListener('DOMContentLoaded', function () {
    render(JSON.parse(document.getElementById('initial-view').textContent));
    for (const id of ['metric-dropdown', 'range-start', 'range-end']) {
        document.getElementById(id).addEventListener('change', pushFilter);
    }
    const events = new EventSource('/api/v1/view/stream');
    events.addEventListener('view', (event) => render(JSON.parse(event.data)));
});
"#;

/// JSON placed inside a `<script>` block must not close it early.
fn script_json(json: &str) -> PreEscaped<String> {
    PreEscaped(json.replace("</", "<\\/"))
}

fn header() -> Markup {
    html! {
        div class="container-fluid bg-light" {
            h3 class="text-center m-4" { "Business Analytics Dashboard" }
        }
    }
}

fn filters(filter: &FilterState, months: &[&str]) -> Markup {
    let last = months.len().saturating_sub(1);
    html! {
        div class="card mb-4" {
            h4 class="card-header" { "Filters" }
            div class="card-body" {
                label { "Select Metric:" }
                select id="metric-dropdown" class="form-select mb-3" {
                    @for metric in Metric::ALL {
                        option value=(metric.name()) selected[metric == filter.metric] { (metric.name()) }
                    }
                }
                label { "Date Range: " span id="range-label" { (months[filter.range.start()]) " - " (months[filter.range.end()]) } }
                datalist id="month-ticks" {
                    @for (index, month) in months.iter().enumerate() {
                        option value=(index) label=(month) {}
                    }
                }
                input type="range" id="range-start" class="form-range" min="0" max=(last) step="1"
                    list="month-ticks" value=(filter.range.start());
                input type="range" id="range-end" class="form-range" min="0" max=(last) step="1"
                    list="month-ticks" value=(filter.range.end());
                div class="d-flex justify-content-between small text-muted mb-3" {
                    @for month in months {
                        span { (month) }
                    }
                }
            }
        }
    }
}

fn key_metrics() -> Markup {
    html! {
        div class="card mb-4" {
            h4 class="card-header" { "Key Metrics" }
            div class="card-body" {
                div class="d-flex justify-content-around" {
                    @for key in ["total", "average", "growth"] {
                        div id=(format!("card-{}", key)) class="text-center p-3" {
                            h3 {}
                            p {}
                        }
                    }
                }
            }
        }
    }
}

fn charts() -> Markup {
    html! {
        div class="row container mx-auto" {
            div class="col-md-8" {
                div class="card mb-4" {
                    h4 class="card-header" { "Monthly Trend" }
                    div id="line-chart" {}
                }
            }
            div class="col-md-4" {
                div class="card mb-4" {
                    h4 class="card-header" { "Comparison" }
                    div id="bar-chart" {}
                }
            }
        }
    }
}

pub fn dashboard_page(filter: &FilterState, months: &[&str], initial_view: &str) -> Markup {
    let month_json = serde_json::to_string(months).unwrap_or_else(|_| "[]".to_string());
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Business Analytics Dashboard" }
                link rel="stylesheet" href=(BOOTSTRAP_CSS);
                script src=(PLOTLY_JS) {}
            }
            body {
                div class="container" {
                    (header())
                    (filters(filter, months))
                    (key_metrics())
                    (charts())
                }
                script id="month-labels" type="application/json" { (script_json(&month_json)) }
                script id="initial-view" type="application/json" { (script_json(initial_view)) }
                script { (PreEscaped(DASHBOARD_SCRIPT)) }
            }
        }
    }
}

pub async fn get_dashboard(store: Arc<DashboardStore>) -> Result<impl warp::Reply, Rejection> {
    info!("Rendering dashboard page");

    let snapshot = store.snapshot();
    let payload = ViewPayload::from_snapshot(&snapshot).map_err(warp::reject::custom)?;
    let initial_view = serde_json::to_string(&payload).map_err(|e| {
        error!("Failed to serialize initial view: {}", e);
        warp::reject::custom(ApiError::internal(e.to_string()))
    })?;
    let months: Vec<&str> = store.dataset().month_labels().collect();

    let page = dashboard_page(&snapshot.filter, &months, &initial_view);
    Ok(warp::reply::html(page.into_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::filter::MonthRange;

    const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

    #[test]
    fn page_has_all_regions() {
        let page = dashboard_page(&FilterState::default(), &MONTHS, "{}").into_string();
        for id in ["metric-dropdown", "range-start", "range-end", "line-chart", "bar-chart", "card-total", "card-average", "card-growth"] {
            assert!(page.contains(&format!("id=\"{}\"", id)), "missing {}", id);
        }
        assert!(page.contains("Business Analytics Dashboard"));
    }

    #[test]
    fn page_reflects_filter_state() {
        let filter = FilterState {
            metric: Metric::Customers,
            range: MonthRange::new(2, 5).unwrap(),
        };
        let page = dashboard_page(&filter, &MONTHS, "{}").into_string();
        assert!(page.contains("<option value=\"Customers\" selected>"));
        assert!(page.contains("<option value=\"Sales\">"));
        assert!(page.contains("Mar - Jun"));
    }

    #[test]
    fn embedded_json_cannot_close_script() {
        let page = dashboard_page(&FilterState::default(), &MONTHS, "{\"x\":\"</script>\"}").into_string();
        assert!(page.contains("<\\/script>"));
    }
}
