//! Dashboard state and the fetch flow that drives it.
//!
//! Each state is an immutable snapshot. Transitions consume a snapshot and
//! return the next one; a fetch result is applied only when its request id
//! matches the latest request, so a slow response for an old selection can
//! never overwrite a newer one.
use super::currency::Currency;
use super::metrics::{self, DateStyle, DerivedMetrics, DisplayPoint};
use super::rates::{RateProvider, RateRecord, RateWindow};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

/// Sequence number of a fetch, increasing with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Loaded {
        points: Vec<DisplayPoint>,
        metrics: DerivedMetrics,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub selection: Currency,
    pub status: LoadStatus,
    latest_request: Option<RequestId>,
    next_request: u64,
}

impl DashboardState {
    pub fn new(selection: Currency) -> Self {
        Self {
            selection,
            status: LoadStatus::Loading,
            latest_request: None,
            next_request: 1,
        }
    }

    /// Switches to another currency. Any previous series is dropped and
    /// fetches started before the switch are no longer current.
    pub fn selection_changed(self, selection: Currency) -> Self {
        Self {
            selection,
            status: LoadStatus::Loading,
            latest_request: None,
            ..self
        }
    }

    /// Registers a new fetch; only its completion will be applied.
    pub fn fetch_started(self) -> (Self, RequestId) {
        let id = RequestId(self.next_request);
        let next = Self {
            status: LoadStatus::Loading,
            latest_request: Some(id),
            next_request: self.next_request + 1,
            ..self
        };
        (next, id)
    }

    pub fn fetch_succeeded(self, id: RequestId, points: Vec<DisplayPoint>) -> Self {
        if !self.is_current(id) {
            debug!(?id, "Ignoring stale fetch result");
            return self;
        }
        let metrics = metrics::derive(&points);
        Self {
            status: LoadStatus::Loaded { points, metrics },
            ..self
        }
    }

    /// A failed fetch degrades to an empty series.
    pub fn fetch_failed(self, id: RequestId) -> Self {
        self.fetch_succeeded(id, Vec::new())
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest_request == Some(id)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading)
    }

    pub fn points(&self) -> &[DisplayPoint] {
        match &self.status {
            LoadStatus::Loaded { points, .. } => points,
            LoadStatus::Loading => &[],
        }
    }

    pub fn metrics(&self) -> Option<&DerivedMetrics> {
        match &self.status {
            LoadStatus::Loaded { metrics, .. } => Some(metrics),
            LoadStatus::Loading => None,
        }
    }
}

/// Fetches rates for the selected currency and keeps the latest snapshot.
pub struct Dashboard {
    provider: Arc<dyn RateProvider>,
    window: RateWindow,
    date_style: DateStyle,
    state: Mutex<DashboardState>,
}

impl Dashboard {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        selection: Currency,
        window: RateWindow,
        date_style: DateStyle,
    ) -> Self {
        Self {
            provider,
            window,
            date_style,
            state: Mutex::new(DashboardState::new(selection)),
        }
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    /// Selects `currency`, fetches its series and returns the resulting
    /// snapshot. If another selection was made while this fetch was in
    /// flight, the returned snapshot reflects that newer selection.
    #[instrument(skip(self), fields(window = %self.window))]
    pub async fn select(&self, currency: Currency) -> DashboardState {
        let id = {
            let mut state = self.state.lock().await;
            let (next, id) = state.clone().selection_changed(currency).fetch_started();
            *state = next;
            id
        };
        debug!(?id, "Fetch started");

        let result = self.provider.fetch_rates(currency, self.window).await;

        let mut state = self.state.lock().await;
        let next = match result {
            Ok(records) => state
                .clone()
                .fetch_succeeded(id, self.to_points(&records)),
            Err(e) => {
                error!(error = %e, %currency, "Failed to fetch rates");
                state.clone().fetch_failed(id)
            }
        };
        *state = next;
        state.clone()
    }

    fn to_points(&self, records: &[RateRecord]) -> Vec<DisplayPoint> {
        metrics::project(records, self.date_style)
    }
}
