//! Transient events surfaced to console subscribers.

use std::fmt;

/// Something the operator should hear about once, as it happens.
///
/// Delivery is best-effort: events are broadcast and dropped when nobody is
/// listening or a subscriber lags.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A job inferred to be scheduler-created appeared in the queue.
    ScheduleJobQueued {
        job_id: i64,
        playlist_label: String,
    },
    /// The pipeline status poll failed; local status was cleared to unknown.
    PipelineStatusUnavailable { message: String },
}

impl fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardEvent::ScheduleJobQueued {
                job_id,
                playlist_label,
            } => write!(
                f,
                "Schedule enqueued job {} for {}",
                job_id, playlist_label
            ),
            DashboardEvent::PipelineStatusUnavailable { message } => {
                write!(f, "Pipeline status unavailable: {}", message)
            }
        }
    }
}
