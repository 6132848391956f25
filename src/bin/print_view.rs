// src/bin/print_view.rs
use anyhow::{Context, Result};
use business_dashboard::data::Dataset;
use business_dashboard::handlers::view::ViewPayload;
use business_dashboard::models::Metric;
use business_dashboard::services::filter::MonthRange;
use business_dashboard::services::store::{DashboardStore, FilterAction};
use clap::Parser;
use std::sync::Arc;

/// Print the dashboard view for one filter without starting the server.
#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long, default_value = "Sales")]
    metric: String,

    #[arg(short, long, default_value_t = 0)]
    start: usize,

    #[arg(short, long, default_value_t = 11)]
    end: usize,

    /// Also dump the full JSON payload
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let metric: Metric = args.metric.parse()?;
    let range = MonthRange::new(args.start, args.end)?;

    let store = DashboardStore::new(Arc::new(Dataset::builtin()?));
    store.dispatch(FilterAction::SetMetric(metric));
    let snapshot = store.dispatch(FilterAction::SetRange(range));
    let payload = ViewPayload::from_snapshot(&snapshot)?;

    for point in &payload.line_series {
        println!("{:>4} {:>10.2}", point.month, point.value);
    }
    for card in [&payload.cards.total, &payload.cards.average, &payload.cards.growth] {
        println!("{:<16} {}", card.label, card.value);
    }
    for (metric, average) in payload.bar_averages.iter() {
        println!("avg {:<12} {:.2}", metric.name(), average);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&payload).context("serializing view payload")?;
        println!("{}", json);
    }
    Ok(())
}
