//! Detection of scheduler-spawned jobs.
//!
//! The backend does not report who created a job, so the console falls back
//! to a heuristic over the job note text and creation time. False negatives
//! happen under clock skew or slow polling; a user note that happens to
//! contain a marker phrase produces a false positive. Both marker and window
//! are deliberately kept in one place so an explicit origin field on the
//! backend can replace this wholesale.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::backend::models::Job;

use super::view_model::{playlist_label, DashboardViewModel};

/// Marker phrases that flag a job note as schedule-originated. The backend's
/// scheduler stamps the Korean phrase; the English word covers manually
/// annotated variants. Matching is case-insensitive substring.
pub const SCHEDULE_NOTE_MARKERS: [&str; 2] = ["schedule", "스케줄"];

/// A job created longer ago than this is never announced, even when unseen.
pub const SCHEDULE_JOB_RECENCY_SECS: i64 = 90;

/// Notification payload for one scheduler-created job.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleJobAlert {
    pub job_id: i64,
    pub playlist_id: i64,
    pub playlist_label: String,
}

/// Diffs job id sets across refresh cycles and flags new jobs that look
/// scheduler-created.
///
/// The very first successful refresh only seeds the known set; it never
/// emits. After every evaluation the known set is replaced wholesale with
/// the current id set, so a job that narrowly misses the recency window is
/// not retried on a later poll.
pub struct ScheduleJobNotifier {
    known: Option<HashSet<i64>>,
}

impl ScheduleJobNotifier {
    pub fn new() -> Self {
        Self { known: None }
    }

    /// Evaluate one refresh's job list, returning alerts for jobs inferred
    /// to be scheduler-created. `now` is the evaluation instant.
    pub fn observe(
        &mut self,
        jobs: &[Job],
        view: &DashboardViewModel,
        now: DateTime<Utc>,
    ) -> Vec<ScheduleJobAlert> {
        let current: HashSet<i64> = jobs.iter().map(|job| job.id).collect();

        let alerts = match &self.known {
            None => {
                debug!("Seeding known job set with {} jobs", current.len());
                Vec::new()
            }
            Some(known) => jobs
                .iter()
                .filter(|job| !known.contains(&job.id))
                .filter(|job| is_schedule_spawned(job, now))
                .map(|job| ScheduleJobAlert {
                    job_id: job.id,
                    playlist_id: job.playlist_id,
                    playlist_label: resolve_playlist_label(view, job.playlist_id),
                })
                .collect(),
        };

        self.known = Some(current);
        alerts
    }
}

impl Default for ScheduleJobNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole heuristic: marker phrase in the note AND created within the
/// recency window of `now`.
fn is_schedule_spawned(job: &Job, now: DateTime<Utc>) -> bool {
    let Some(note) = job.note.as_deref() else {
        return false;
    };
    if !note_indicates_schedule(note) {
        return false;
    }
    let Some(created_at) = parse_backend_timestamp(&job.created_at) else {
        debug!(
            "Job {} has unparseable created_at '{}', skipping origin check",
            job.id, job.created_at
        );
        return false;
    };
    // Jobs stamped slightly in the future (clock skew) count as just created.
    let age_secs = now.signed_duration_since(created_at).num_seconds();
    age_secs <= SCHEDULE_JOB_RECENCY_SECS
}

/// True when the note text contains any schedule-origin marker.
fn note_indicates_schedule(note: &str) -> bool {
    let lowered = note.to_lowercase();
    SCHEDULE_NOTE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Lenient parse of the backend's timestamps.
///
/// Accepts RFC 3339 and naive ISO-8601 (assumed UTC), with or without
/// fractional seconds.
pub(crate) fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn resolve_playlist_label(view: &DashboardViewModel, playlist_id: i64) -> String {
    view.find_playlist(playlist_id)
        .map(|playlist| playlist_label(playlist).to_string())
        .unwrap_or_else(|| format!("Playlist #{}", playlist_id))
}
