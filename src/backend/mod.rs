//! HTTP boundary to the automation service.
//!
//! `AutomationApi` is the seam the dashboard engine is written against;
//! `BackendClient` is the reqwest implementation used in production.

mod client;
mod error;
pub mod models;

pub use client::BackendClient;
pub use error::BackendError;

use async_trait::async_trait;

use models::{
    Channel, ChannelInput, ChannelPatch, Job, JobInput, JobPatch, PipelineStatus, Playlist,
    PlaylistInput, PodcastTarget, QuickCreateJobInput, QuickCreateJobResponse, RunInput, RunRecord,
    Schedule, ScheduleInput, SchedulePatch,
};

/// Read and mutation operations exposed by the automation service.
///
/// Every call maps to exactly one HTTP request; retries, degradation and
/// reload discipline are the caller's concern.
#[async_trait]
pub trait AutomationApi: Send + Sync {
    async fn list_channels(&self) -> Result<Vec<Channel>, BackendError>;
    async fn create_channel(&self, input: &ChannelInput) -> Result<Channel, BackendError>;
    async fn update_channel(
        &self,
        channel_id: i64,
        patch: &ChannelPatch,
    ) -> Result<Channel, BackendError>;
    async fn delete_channel(&self, channel_id: i64) -> Result<(), BackendError>;

    async fn list_playlists(&self) -> Result<Vec<Playlist>, BackendError>;
    async fn create_playlist(&self, input: &PlaylistInput) -> Result<Playlist, BackendError>;

    async fn list_schedules(&self) -> Result<Vec<Schedule>, BackendError>;
    async fn create_schedule(&self, input: &ScheduleInput) -> Result<Schedule, BackendError>;
    async fn update_schedule(
        &self,
        schedule_id: i64,
        patch: &SchedulePatch,
    ) -> Result<Schedule, BackendError>;
    async fn delete_schedule(&self, schedule_id: i64) -> Result<(), BackendError>;

    /// List run records, newest-relevant, capped server-side at `limit`.
    async fn list_runs(&self, limit: usize) -> Result<Vec<RunRecord>, BackendError>;
    async fn create_run(&self, input: &RunInput) -> Result<RunRecord, BackendError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, BackendError>;
    async fn create_job(&self, input: &JobInput) -> Result<Job, BackendError>;
    async fn update_job(&self, job_id: i64, patch: &JobPatch) -> Result<Job, BackendError>;
    async fn delete_job(&self, job_id: i64) -> Result<(), BackendError>;
    async fn delete_all_jobs(&self) -> Result<(), BackendError>;
    async fn quick_create_job(
        &self,
        input: &QuickCreateJobInput,
    ) -> Result<QuickCreateJobResponse, BackendError>;

    async fn pipeline_status(&self) -> Result<PipelineStatus, BackendError>;
    async fn trigger_pipeline(&self) -> Result<PipelineStatus, BackendError>;

    async fn list_podcast_targets(&self) -> Result<Vec<PodcastTarget>, BackendError>;
}
