//! Load state and background loading.
//!
//! A view asks for a resource, keeps rendering while the fetch runs on a worker
//! thread, and applies the outcome when it arrives. Each request carries a
//! [`Ticket`]; a [`ResourceSlot`] only accepts the outcome of its most recent
//! ticket, so a slow response for an earlier request can never overwrite a
//! newer one.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::data::fetch::Fetch;
use crate::data::record::{Record, parse_records};
use crate::error::LoadError;

/// Outcome of one load: records plus an optional error message.
///
/// On failure `data` is always the empty collection, never absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub data: Vec<Record>,
    pub error: Option<String>,
}

impl Loaded {
    pub fn ok(data: Vec<Record>) -> Self {
        Self { data, error: None }
    }

    pub fn failed(err: &LoadError) -> Self {
        Self {
            data: Vec::new(),
            error: Some(err.to_string()),
        }
    }
}

/// Fetch and parse a resource synchronously.
pub fn load(fetcher: &dyn Fetch, resource: &str) -> Loaded {
    match fetcher.fetch(resource).and_then(|body| parse_records(&body)) {
        Ok(records) => {
            tracing::info!(resource, rows = records.len(), "loaded");
            Loaded::ok(records)
        }
        Err(err) => {
            tracing::warn!(resource, error = %err, "load failed");
            Loaded::failed(&err)
        }
    }
}

/// Transient state of a resource inside a view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Pending,
    Ready(Vec<Record>),
    Failed(String),
}

impl LoadState {
    /// Records to shape; empty unless ready.
    pub fn records(&self) -> &[Record] {
        match self {
            LoadState::Ready(records) => records,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    /// Settled means a fetch finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Ready(_) | LoadState::Failed(_))
    }
}

impl From<Loaded> for LoadState {
    fn from(loaded: Loaded) -> Self {
        match loaded.error {
            Some(msg) => LoadState::Failed(msg),
            None => LoadState::Ready(loaded.data),
        }
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A completed background request.
#[derive(Debug)]
pub struct Delivery {
    pub ticket: Ticket,
    pub resource: String,
    pub loaded: Loaded,
}

/// Runs fetches on worker threads and collects their outcomes.
pub struct Loader {
    fetcher: Arc<dyn Fetch>,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    next_ticket: u64,
}

impl Loader {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            fetcher,
            tx,
            rx,
            next_ticket: 0,
        }
    }

    pub fn fetcher(&self) -> &dyn Fetch {
        self.fetcher.as_ref()
    }

    /// Start fetching `resource` in the background.
    pub fn request(&mut self, resource: &str) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let resource = resource.to_string();
        tracing::debug!(resource = %resource, ticket = ticket.0, "request");

        std::thread::spawn(move || {
            let loaded = load(fetcher.as_ref(), &resource);
            // The receiver is gone only when the dashboard is shutting down.
            let _ = tx.send(Delivery {
                ticket,
                resource,
                loaded,
            });
        });

        ticket
    }

    /// Collect every delivery that has arrived so far, without blocking.
    pub fn drain(&self) -> Vec<Delivery> {
        self.rx.try_iter().collect()
    }

    /// Block for the next delivery, up to `timeout`.
    pub fn wait(&self, timeout: std::time::Duration) -> Option<Delivery> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// One resource a view depends on, with last-request-wins bookkeeping.
#[derive(Debug, Clone)]
pub struct ResourceSlot {
    resource: String,
    latest: Option<Ticket>,
    state: LoadState,
}

impl ResourceSlot {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            latest: None,
            state: LoadState::Idle,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Issue a fresh request, superseding any in flight.
    pub fn begin(&mut self, loader: &mut Loader) {
        let ticket = loader.request(&self.resource);
        self.mark_pending(ticket);
    }

    /// Point the slot at another resource and fetch it.
    pub fn retarget(&mut self, resource: impl Into<String>, loader: &mut Loader) {
        self.resource = resource.into();
        self.begin(loader);
    }

    pub fn mark_pending(&mut self, ticket: Ticket) {
        self.latest = Some(ticket);
        self.state = LoadState::Pending;
    }

    /// Apply an outcome; returns `false` (and changes nothing) when stale.
    pub fn accept(&mut self, ticket: Ticket, loaded: Loaded) -> bool {
        if self.latest != Some(ticket) {
            tracing::debug!(resource = %self.resource, ticket = ticket.0, "discarding superseded result");
            return false;
        }
        self.state = LoadState::from(loaded);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stub::StubFetcher;
    use std::time::{Duration, Instant};

    #[test]
    fn http_500_yields_empty_data_and_message() {
        let fetcher = StubFetcher::new().with("x.json", Err(LoadError::Status(500)));
        let loaded = load(&fetcher, "x.json");
        assert_eq!(loaded.data, Vec::<Record>::new());
        assert_eq!(loaded.error.as_deref(), Some("HTTP 500"));
    }

    #[test]
    fn non_array_payload_is_a_failure() {
        let fetcher = StubFetcher::new().with("x.json", Ok(r#"{"rows": []}"#));
        let loaded = load(&fetcher, "x.json");
        assert!(loaded.data.is_empty());
        assert!(loaded.error.unwrap().starts_with("Expected a JSON array"));
    }

    #[test]
    fn failed_state_exposes_no_records() {
        let state = LoadState::from(Loaded::failed(&LoadError::Parse("eof".into())));
        assert!(state.records().is_empty());
        assert_eq!(state.error(), Some("Invalid JSON: eof"));
        assert!(state.is_settled());
    }

    #[test]
    fn slot_ignores_stale_tickets() {
        let mut slot = ResourceSlot::new("a.json");

        let first = Ticket(1);
        let second = Ticket(2);
        slot.mark_pending(first);
        slot.mark_pending(second);

        let rows = crate::data::record::records(serde_json::json!([{"v": 1}]));
        assert!(!slot.accept(first, Loaded::ok(rows.clone())));
        assert!(slot.state().is_pending());

        assert!(slot.accept(second, Loaded::ok(rows)));
        assert_eq!(slot.state().records().len(), 1);
    }

    #[test]
    fn later_request_wins_even_when_earlier_finishes_last() {
        let fetcher: Arc<dyn Fetch> = Arc::new(
            StubFetcher::new()
                .with("slow.json", Ok(r#"[{"v": 1}]"#))
                .with("fast.json", Ok(r#"[{"v": 2}, {"v": 3}]"#))
                .delayed("slow.json", Duration::from_millis(150)),
        );
        let mut loader = Loader::new(fetcher);
        let mut slot = ResourceSlot::new("slow.json");

        slot.begin(&mut loader);
        slot.retarget("fast.json", &mut loader);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = 0;
        while received < 2 && Instant::now() < deadline {
            if let Some(d) = loader.wait(Duration::from_millis(50)) {
                slot.accept(d.ticket, d.loaded);
                received += 1;
            }
        }

        assert_eq!(received, 2);
        assert_eq!(slot.resource(), "fast.json");
        assert_eq!(slot.state().records().len(), 2);
    }
}
