// src/services/store.rs
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::data::Dataset;
use crate::models::{DerivedView, Metric};
use crate::services::calculations::derive_view;
use crate::services::filter::{FilterState, MonthRange};

/// The only ways the filter state changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterAction {
    SetMetric(Metric),
    SetRange(MonthRange),
    /// Partial update; fields left `None` keep whatever the store holds when
    /// the action is applied.
    Update {
        metric: Option<Metric>,
        range: Option<MonthRange>,
    },
    Reset,
}

impl FilterAction {
    fn apply(self, current: FilterState) -> FilterState {
        match self {
            FilterAction::SetMetric(metric) => FilterState { metric, ..current },
            FilterAction::SetRange(range) => FilterState { range, ..current },
            FilterAction::Update { metric, range } => FilterState {
                metric: metric.unwrap_or(current.metric),
                range: range.unwrap_or(current.range),
            },
            FilterAction::Reset => FilterState::default(),
        }
    }
}

/// A filter state together with the view computed from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filter: FilterState,
    pub view: DerivedView,
}

impl DashboardSnapshot {
    fn compute(dataset: &Dataset, filter: FilterState) -> Self {
        DashboardSnapshot {
            filter,
            view: derive_view(dataset, &filter),
        }
    }
}

/// Holds the single filter state. Every dispatched action recomputes the view
/// once and publishes the new snapshot to all subscribers.
pub struct DashboardStore {
    dataset: Arc<Dataset>,
    snapshot_tx: watch::Sender<Arc<DashboardSnapshot>>,
}

impl DashboardStore {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let initial = DashboardSnapshot::compute(&dataset, FilterState::default());
        let (snapshot_tx, _) = watch::channel(Arc::new(initial));
        Self { dataset, snapshot_tx }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Applies `action` and returns the resulting snapshot. An action that
    /// leaves the filter unchanged does not notify subscribers.
    pub fn dispatch(&self, action: FilterAction) -> Arc<DashboardSnapshot> {
        let mut result = None;
        self.snapshot_tx.send_if_modified(|current| {
            let next = action.apply(current.filter);
            if next == current.filter {
                debug!("{:?} left filter unchanged", action);
                result = Some(current.clone());
                return false;
            }

            info!(
                "Filter changed to {} over months {}..={}",
                next.metric,
                next.range.start(),
                next.range.end()
            );
            let snapshot = Arc::new(DashboardSnapshot::compute(&self.dataset, next));
            *current = snapshot.clone();
            result = Some(snapshot);
            true
        });
        result.unwrap_or_else(|| self.snapshot())
    }

    /// Computes the view for `filter` without touching the stored state.
    pub fn preview(&self, filter: FilterState) -> DashboardSnapshot {
        DashboardSnapshot::compute(&self.dataset, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DashboardStore {
        DashboardStore::new(Arc::new(Dataset::builtin().unwrap()))
    }

    #[test]
    fn starts_with_default_filter() {
        let snapshot = store().snapshot();
        assert_eq!(snapshot.filter, FilterState::default());
        assert_eq!(snapshot.view.summary.total, 20400.0);
    }

    #[test]
    fn actions_update_filter() {
        let store = store();
        store.dispatch(FilterAction::SetMetric(Metric::Customers));
        let snapshot = store.dispatch(FilterAction::SetRange(MonthRange::new(0, 2).unwrap()));
        assert_eq!(snapshot.filter.metric, Metric::Customers);
        assert_eq!(snapshot.view.summary.total, 335.0);
        assert_eq!(store.snapshot(), snapshot);

        let reset = store.dispatch(FilterAction::Reset);
        assert_eq!(reset.filter, FilterState::default());
    }

    #[test]
    fn preview_leaves_state_alone() {
        let store = store();
        let preview = store.preview(FilterState {
            metric: Metric::Expenses,
            range: MonthRange::new(3, 3).unwrap(),
        });
        assert_eq!(preview.view.summary.total, 950.0);
        assert_eq!(store.snapshot().filter, FilterState::default());
    }

    #[tokio::test]
    async fn subscribers_see_each_change() {
        let store = store();
        let mut rx = store.subscribe();

        store.dispatch(FilterAction::SetMetric(Metric::Expenses));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().filter.metric, Metric::Expenses);

        store.dispatch(FilterAction::SetRange(MonthRange::new(5, 6).unwrap()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().view.line_series.len(), 2);
    }

    #[tokio::test]
    async fn unchanged_filter_does_not_notify() {
        let store = store();
        let mut rx = store.subscribe();

        let snapshot = store.dispatch(FilterAction::Update {
            metric: Some(Metric::Sales),
            range: Some(MonthRange::FULL_YEAR),
        });
        assert_eq!(snapshot.filter, FilterState::default());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn update_keeps_fields_it_does_not_set() {
        let store = store();
        store.dispatch(FilterAction::SetRange(MonthRange::new(3, 4).unwrap()));
        let snapshot = store.dispatch(FilterAction::Update { metric: Some(Metric::Customers), range: None });
        assert_eq!(
            snapshot.filter,
            FilterState { metric: Metric::Customers, range: MonthRange::new(3, 4).unwrap() }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_partial_updates_both_land() {
        for _ in 0..200 {
            let store = Arc::new(store());
            let metric_store = store.clone();
            let range_store = store.clone();
            let metric_task = tokio::spawn(async move {
                metric_store.dispatch(FilterAction::Update { metric: Some(Metric::Customers), range: None });
            });
            let range_task = tokio::spawn(async move {
                range_store.dispatch(FilterAction::Update { metric: None, range: Some(MonthRange::new(3, 4).unwrap()) });
            });
            metric_task.await.unwrap();
            range_task.await.unwrap();

            let filter = store.snapshot().filter;
            assert_eq!(filter.metric, Metric::Customers);
            assert_eq!(filter.range, MonthRange::new(3, 4).unwrap());
        }
    }
}
