//! One dashboard refresh worth of backend reads.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::backend::models::{Channel, Job, Playlist, RunRecord, Schedule};
use crate::backend::{AutomationApi, BackendError};

/// Run history is bounded to the most recent entries the backend returns.
pub const RUNS_FETCH_LIMIT: usize = 50;

/// Flat snapshot of all collections fetched in one refresh cycle.
///
/// Consumers that need orphaned records (children whose parent is missing)
/// read these lists; the joined tree omits them.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub channels: Vec<Channel>,
    pub playlists: Vec<Playlist>,
    pub schedules: Vec<Schedule>,
    pub runs: Vec<RunRecord>,
    pub jobs: Vec<Job>,
    pub fetched_at: DateTime<Utc>,
}

/// Fetch all five collections concurrently.
///
/// Channels, playlists and schedules are hard dependencies: the first
/// failure among them aborts the refresh. Runs and jobs are soft: a failure
/// degrades that collection to empty and the refresh carries on. No retries
/// here; the polling cadence is the recovery path.
pub async fn fetch_snapshot(api: &dyn AutomationApi) -> Result<DashboardSnapshot, BackendError> {
    let (channels, playlists, schedules, runs, jobs) = tokio::join!(
        api.list_channels(),
        api.list_playlists(),
        api.list_schedules(),
        api.list_runs(RUNS_FETCH_LIMIT),
        api.list_jobs(),
    );

    let channels = channels?;
    let playlists = playlists?;
    let schedules = schedules?;

    let runs = runs.unwrap_or_else(|err| {
        warn!("Runs fetch failed, degrading to empty history: {}", err);
        Vec::new()
    });
    let jobs = jobs.unwrap_or_else(|err| {
        warn!("Jobs fetch failed, degrading to empty queue: {}", err);
        Vec::new()
    });

    Ok(DashboardSnapshot {
        channels,
        playlists,
        schedules,
        runs,
        jobs,
        fetched_at: Utc::now(),
    })
}
