// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;
use log::{error, info};
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::dashboard::get_dashboard;
use crate::handlers::error::ApiError;
use crate::handlers::view::{get_dataset, get_filter, get_view, reset_filter, stream_view, update_filter};
use crate::services::store::DashboardStore;

const MAX_BODY_BYTES: u64 = 16 * 1024;

// Turn rejections into JSON error bodies
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status();
        message = api_error.message.clone();
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = e.to_string();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        error!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(store: Arc<DashboardStore>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());

    let dashboard_route = warp::path::end()
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_dashboard);

    let dataset_route = warp::path!("api" / "v1" / "dataset")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_dataset);

    let get_filter_route = warp::path!("api" / "v1" / "filter")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_filter);

    let update_filter_route = warp::path!("api" / "v1" / "filter")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(store_filter.clone())
        .and_then(update_filter);

    let reset_filter_route = warp::path!("api" / "v1" / "filter" / "reset")
        .and(warp::post())
        .and(store_filter.clone())
        .and_then(reset_filter);

    let view_route = warp::path!("api" / "v1" / "view")
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(get_view);

    let view_stream_route = warp::path!("api" / "v1" / "view" / "stream")
        .and(warp::get())
        .and(store_filter.clone())
        .map(stream_view);

    info!("All routes configured successfully.");

    dashboard_route
        .or(dataset_route)
        .or(get_filter_route)
        .or(update_filter_route)
        .or(reset_filter_route)
        .or(view_route)
        .or(view_stream_route)
        .recover(handle_rejection)
}
