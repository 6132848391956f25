// src/handlers/view.rs
use futures::{future, stream, StreamExt};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::reply::Json;
use warp::sse::Event;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{BarAverages, LinePoint, Metric, Summary};
use crate::services::charts::{bar_figure, line_figure, Figure};
use crate::services::filter::{FilterState, MonthRange};
use crate::services::format::SummaryCards;
use crate::services::store::{DashboardSnapshot, DashboardStore, FilterAction};

/// Everything the page needs to redraw its five output regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPayload {
    pub filter: FilterState,
    pub line_series: Vec<LinePoint>,
    pub bar_averages: BarAverages,
    pub summary: Summary,
    pub cards: SummaryCards,
    pub line_figure: Figure,
    pub bar_figure: Figure,
}

impl ViewPayload {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Result<Self, ApiError> {
        let metric = snapshot.filter.metric;
        let view = &snapshot.view;
        let to_api_error = |e: serde_json::Error| {
            error!("Failed to build chart figure: {}", e);
            ApiError::internal(format!("Failed to build chart figure: {}", e))
        };

        Ok(ViewPayload {
            filter: snapshot.filter,
            line_series: view.line_series.clone(),
            bar_averages: view.bar_averages,
            summary: view.summary,
            cards: SummaryCards::new(metric, &view.summary),
            line_figure: line_figure(metric, &view.line_series).map_err(to_api_error)?,
            bar_figure: bar_figure(&view.bar_averages).map_err(to_api_error)?,
        })
    }
}

/// Body of `POST /api/v1/filter`. Missing fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct FilterUpdate {
    pub metric: Option<Metric>,
    pub range: Option<[usize; 2]>,
}

/// Query of `GET /api/v1/view`. Any field present turns the request into a
/// preview that does not change the stored filter.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub metric: Option<Metric>,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ViewQuery {
    fn is_empty(&self) -> bool {
        self.metric.is_none() && self.start.is_none() && self.end.is_none()
    }
}

fn payload_reply(snapshot: &DashboardSnapshot) -> Result<Json, Rejection> {
    let payload = ViewPayload::from_snapshot(snapshot).map_err(warp::reject::custom)?;
    debug!("Returning summary {:?}", payload.summary);
    Ok(warp::reply::json(&payload))
}

pub async fn get_dataset(store: Arc<DashboardStore>) -> Result<Json, Rejection> {
    info!("Handling request to get dataset");
    Ok(warp::reply::json(store.dataset()))
}

pub async fn get_filter(store: Arc<DashboardStore>) -> Result<Json, Rejection> {
    info!("Handling request to get filter state");
    Ok(warp::reply::json(&store.snapshot().filter))
}

pub async fn update_filter(update: FilterUpdate, store: Arc<DashboardStore>) -> Result<Json, Rejection> {
    info!("Handling filter update: {:?}", update);

    let range = update
        .range
        .map(|[start, end]| MonthRange::new(start, end))
        .transpose()
        .map_err(|e| {
            error!("Rejected filter update: {}", e);
            warp::reject::custom(ApiError::bad_request(e.to_string()))
        })?;

    // Merged against the stored filter inside the store, not here
    let snapshot = store.dispatch(FilterAction::Update {
        metric: update.metric,
        range,
    });
    payload_reply(&snapshot)
}

pub async fn reset_filter(store: Arc<DashboardStore>) -> Result<Json, Rejection> {
    info!("Handling filter reset");
    let snapshot = store.dispatch(FilterAction::Reset);
    payload_reply(&snapshot)
}

pub async fn get_view(query: ViewQuery, store: Arc<DashboardStore>) -> Result<Json, Rejection> {
    if query.is_empty() {
        info!("Handling request to get current view");
        return payload_reply(&store.snapshot());
    }

    info!("Handling view preview: {:?}", query);
    let current = store.snapshot().filter;
    let filter = FilterState {
        metric: query.metric.unwrap_or(current.metric),
        range: MonthRange::clamped(
            query.start.unwrap_or(current.range.start()),
            query.end.unwrap_or(current.range.end()),
        ),
    };
    payload_reply(&store.preview(filter))
}

fn view_event(snapshot: &DashboardSnapshot) -> Result<Event, ApiError> {
    let payload = ViewPayload::from_snapshot(snapshot)?;
    Event::default()
        .event("view")
        .json_data(&payload)
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Server-sent events: the current view first, then one `view` event per
/// filter change.
pub fn stream_view(store: Arc<DashboardStore>) -> impl warp::Reply {
    info!("Opening view stream");
    let rx = store.subscribe();
    let initial = rx.borrow().clone();

    let updates = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        Some((snapshot, rx))
    });
    let events = stream::once(future::ready(initial))
        .chain(updates)
        .map(|snapshot| view_event(&snapshot));

    warp::sse::reply(warp::sse::keep_alive().stream(events))
}
