//! Refresh orchestration: the polling timer, manual refreshes, and the
//! generation discipline that resolves overlapping cycles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::models::PodcastTarget;
use crate::backend::{AutomationApi, BackendError};

use super::events::DashboardEvent;
use super::notifier::ScheduleJobNotifier;
use super::pipeline::PipelineStatusTracker;
use super::snapshot::fetch_snapshot;
use super::state::DashboardState;
use super::view_model::join;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Period of the auto-refresh timer.
    pub refresh_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
        }
    }
}

/// Drives periodic and on-demand dashboard synchronization.
///
/// Refresh cycles are not serialized: a manual refresh and a timer tick may
/// run concurrently. Every cycle takes a generation number and a completed
/// cycle is discarded unless its generation is still the latest issued, so
/// a slow stale response can never overwrite a newer one.
pub struct DashboardEngine {
    api: Arc<dyn AutomationApi>,
    state: Arc<DashboardState>,
    pipeline: PipelineStatusTracker,
    notifier: Mutex<ScheduleJobNotifier>,
    events: broadcast::Sender<DashboardEvent>,
    issued: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
    refresh_interval: Duration,
}

impl DashboardEngine {
    pub fn new(api: Arc<dyn AutomationApi>, config: EngineConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        let state = Arc::new(DashboardState::new());
        let pipeline = PipelineStatusTracker::new(api.clone(), state.clone(), events.clone());
        Arc::new(Self {
            api,
            state,
            pipeline,
            notifier: Mutex::new(ScheduleJobNotifier::new()),
            events,
            issued: AtomicU64::new(0),
            timer: Mutex::new(None),
            refresh_interval: config.refresh_interval,
        })
    }

    pub fn state(&self) -> Arc<DashboardState> {
        self.state.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn pipeline(&self) -> &PipelineStatusTracker {
        &self.pipeline
    }

    pub(crate) fn api(&self) -> Arc<dyn AutomationApi> {
        self.api.clone()
    }

    /// Run one refresh cycle immediately, independent of the timer.
    pub async fn refresh_now(self: &Arc<Self>) {
        Arc::clone(self).run_refresh().await;
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.timer_slot().is_some()
    }

    /// Toggle the auto-refresh timer.
    ///
    /// Turning it on (re)starts the period from a fresh boundary; turning it
    /// off cancels only the timer, never a refresh already in flight. Ticks
    /// spawn their refresh as an independent task for the same reason.
    pub fn set_auto_refresh(self: &Arc<Self>, enabled: bool) {
        let mut slot = self.timer_slot();
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        if !enabled {
            debug!("Auto-refresh disabled");
            return;
        }

        debug!("Auto-refresh enabled (every {:?})", self.refresh_interval);
        let weak = Arc::downgrade(self);
        let period = self.refresh_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);

            // Consume the interval's immediate first tick so the period
            // starts counting from now.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(engine) = weak.upgrade() else {
                    break;
                };
                tokio::spawn(async move { engine.run_refresh().await });
            }
        });
        *slot = Some(handle);
    }

    /// Stop the timer. In-flight refreshes are left to resolve on their own.
    pub fn shutdown(&self) {
        if let Some(handle) = self.timer_slot().take() {
            handle.abort();
        }
    }

    /// Passthrough for the publishing-catalog picker feed.
    pub async fn publishing_targets(&self) -> Result<Vec<PodcastTarget>, BackendError> {
        self.api.list_podcast_targets().await
    }

    async fn run_refresh(self: Arc<Self>) {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Refresh generation {} started", generation);

        // The pipeline poll rides along but is independent: its failure is
        // absorbed by the tracker and never aborts this cycle.
        let (snapshot, ()) = tokio::join!(
            fetch_snapshot(self.api.as_ref()),
            self.pipeline.refresh()
        );

        if self.issued.load(Ordering::SeqCst) != generation {
            debug!("Discarding refresh generation {} (superseded)", generation);
            return;
        }

        match snapshot {
            Ok(snapshot) => {
                let view = join(
                    &snapshot.channels,
                    &snapshot.playlists,
                    &snapshot.schedules,
                    &snapshot.runs,
                );
                let alerts = self
                    .notifier_slot()
                    .observe(&snapshot.jobs, &view, Utc::now());
                for alert in alerts {
                    info!(
                        "Schedule enqueued job {} for {}",
                        alert.job_id, alert.playlist_label
                    );
                    let _ = self.events.send(DashboardEvent::ScheduleJobQueued {
                        job_id: alert.job_id,
                        playlist_label: alert.playlist_label,
                    });
                }
                self.state.apply_refresh(snapshot, view);
                debug!("Refresh generation {} applied", generation);
            }
            Err(err) => {
                warn!("Dashboard refresh failed: {}", err);
                self.state.record_refresh_error(err.to_string());
            }
        }
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notifier_slot(&self) -> MutexGuard<'_, ScheduleJobNotifier> {
        self.notifier
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for DashboardEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.timer_slot().take() {
            handle.abort();
        }
    }
}
