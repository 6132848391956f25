use business_dashboard::config::Config;
use business_dashboard::data::Dataset;
use business_dashboard::routes;
use business_dashboard::services::store::DashboardStore;
use anyhow::Context;
use log::info;
use std::sync::Arc;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();

    // Initialize the logger; RUST_LOG wins over --debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.default_log_filter())).init();
    info!("Logger initialized. Starting the dashboard...");
    if config.debug {
        info!("Debug mode enabled");
    }

    let addr = config.socket_addr();
    info!("Will bind to: {}", addr);

    let dataset = Arc::new(Dataset::builtin().context("built-in dataset is invalid")?);
    info!("Loaded dataset with {} monthly records", dataset.records().len());
    let store = Arc::new(DashboardStore::new(dataset));

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(store)
        .with(cors)
        .with(warp::log("business_dashboard::http"));
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;
    Ok(())
}
