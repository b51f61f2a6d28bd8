//! Owner of the console's mutable dashboard state.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::backend::models::PipelineStatus;

use super::snapshot::DashboardSnapshot;
use super::view_model::DashboardViewModel;

#[derive(Default)]
struct StateInner {
    view: Option<DashboardViewModel>,
    snapshot: Option<DashboardSnapshot>,
    pipeline: Option<PipelineStatus>,
    last_error: Option<String>,
    last_synced_at: Option<DateTime<Utc>>,
    revision: u64,
}

/// All state the console renders, behind one lock, with a watch channel that
/// fires on every change.
///
/// Mutation goes through the defined operations below; readers get cheap
/// clones of the current snapshot. The lock is only ever held for synchronous
/// bookkeeping, never across an await point.
pub struct DashboardState {
    inner: Mutex<StateInner>,
    changed: watch::Sender<u64>,
}

impl DashboardState {
    pub fn new() -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            inner: Mutex::new(StateInner::default()),
            changed,
        }
    }

    /// Receiver that yields after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    pub fn view(&self) -> Option<DashboardViewModel> {
        self.lock().view.clone()
    }

    /// The flat collections behind the current view, orphans included.
    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.lock().snapshot.clone()
    }

    pub fn pipeline_status(&self) -> Option<PipelineStatus> {
        self.lock().pipeline.clone()
    }

    /// Error banner text from the last failed refresh, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.lock().last_synced_at
    }

    pub(crate) fn apply_refresh(&self, snapshot: DashboardSnapshot, view: DashboardViewModel) {
        let mut inner = self.lock();
        inner.last_synced_at = Some(snapshot.fetched_at);
        inner.snapshot = Some(snapshot);
        inner.view = Some(view);
        inner.last_error = None;
        self.bump(&mut inner);
    }

    /// A hard refresh failure: previously displayed data stays in place.
    pub(crate) fn record_refresh_error(&self, message: String) {
        let mut inner = self.lock();
        inner.last_error = Some(message);
        self.bump(&mut inner);
    }

    pub(crate) fn set_pipeline_status(&self, status: Option<PipelineStatus>) {
        let mut inner = self.lock();
        inner.pipeline = status;
        self.bump(&mut inner);
    }

    fn lock(&self) -> MutexGuard<'_, StateInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bump(&self, inner: &mut StateInner) {
        inner.revision += 1;
        self.changed.send_replace(inner.revision);
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
