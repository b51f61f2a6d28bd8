//! Wire models for the automation service API.
//!
//! Field names mirror the backend's JSON exactly; the console never invents
//! or persists these entities, it only reads snapshots and posts mutations.

use serde::{Deserialize, Serialize};

/// A content source owning zero or more playlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

/// A trackable external content list tied to one channel, optionally linked
/// to a publishing target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: i64,
    pub channel_id: i64,
    pub youtube_playlist_id: String,
    pub title: Option<String>,
    pub is_active: bool,
    pub castopod_slug: Option<String>,
    pub castopod_uuid: Option<String>,
}

/// A recurring-time rule that makes the backend enqueue jobs automatically.
///
/// Timestamps travel as strings; the backend emits both offset-bearing and
/// naive ISO-8601 depending on the field's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub playlist_id: i64,
    pub days_of_week: Vec<String>,
    pub run_time: String,
    pub timezone: String,
    pub is_active: bool,
    pub next_run_at: Option<String>,
    pub last_run_at: Option<String>,
}

/// Historical record of one execution attempt for a playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: i64,
    pub playlist_id: i64,
    pub status: String,
    pub message: Option<String>,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub progress_total: i64,
    pub progress_completed: i64,
    pub current_task: Option<String>,
    pub progress_message: Option<String>,
}

/// A queued or executing unit of work against a playlist.
///
/// `status` is an open vocabulary owned by the backend
/// (`queued`, `in_progress`, `cancelling`, `finished`, `failed`, ...), so it
/// stays a plain string here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub playlist_id: i64,
    pub action: String,
    pub status: String,
    pub castopod_slug: Option<String>,
    pub castopod_playlist_uuid: Option<String>,
    pub note: Option<String>,
    pub should_castopod_upload: bool,
    pub progress_total: i64,
    pub progress_completed: i64,
    pub current_task: Option<String>,
    pub progress_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// State of the backend's singleton batch process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub running: bool,
    pub pid: Option<i64>,
    pub command: String,
    pub started_at: Option<String>,
    pub last_started_at: Option<String>,
    pub last_finished_at: Option<String>,
    pub last_exit_code: Option<i64>,
    pub log_path: Option<String>,
}

/// An available external podcast target from the publishing catalog,
/// used to populate selection pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastTarget {
    pub id: i64,
    pub uuid: String,
    pub title: String,
    pub slug: String,
}

// ---------------------------------------------------------------------------
// Mutation payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChannelInput {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChannelPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistInput {
    pub channel_id: i64,
    pub youtube_playlist_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub castopod_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub castopod_uuid: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleInput {
    pub playlist_id: i64,
    pub days_of_week: Vec<String>,
    pub run_time: String,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Payload for creating a run record (used for manual triggers).
#[derive(Debug, Clone, Serialize)]
pub struct RunInput {
    pub playlist_id: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobInput {
    pub playlist_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub castopod_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub castopod_playlist_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_castopod_upload: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_castopod_upload: Option<bool>,
}

/// Quick-create: one request that creates a channel and/or playlist on
/// demand alongside a new job.
#[derive(Debug, Clone, Serialize)]
pub struct QuickCreateJobInput {
    pub job_name: String,
    pub youtube_playlist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub castopod_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub castopod_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_castopod_upload: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickCreateJobResponse {
    pub channel: Channel,
    pub playlist: Playlist,
    pub job: Job,
    pub created_channel: bool,
    pub created_playlist: bool,
}
