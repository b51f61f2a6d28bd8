//! Mutation gateway: every write goes to the backend as one request, and a
//! success forces a full dashboard reload instead of patching state locally.
//!
//! This trades a round-trip of latency for the guarantee that the rendered
//! tree can never diverge from server truth after a mutation. Failures are
//! returned to the caller with the server's detail message intact and are
//! never retried; the next poll is the recovery path.

use std::sync::Arc;

use tracing::info;

use crate::backend::models::{
    Channel, ChannelInput, ChannelPatch, Job, JobInput, JobPatch, Playlist, PlaylistInput,
    QuickCreateJobInput, QuickCreateJobResponse, RunInput, RunRecord, Schedule, ScheduleInput,
    SchedulePatch,
};
use crate::backend::BackendError;

use super::engine::DashboardEngine;

/// Message posted with a manually triggered run record.
const MANUAL_RUN_MESSAGE: &str = "Triggered from operator console";

pub struct MutationGateway {
    engine: Arc<DashboardEngine>,
}

impl MutationGateway {
    pub fn new(engine: Arc<DashboardEngine>) -> Self {
        Self { engine }
    }

    pub async fn create_channel(&self, input: &ChannelInput) -> Result<Channel, BackendError> {
        let channel = self.engine.api().create_channel(input).await?;
        info!("Created channel '{}'", channel.slug);
        self.engine.refresh_now().await;
        Ok(channel)
    }

    pub async fn update_channel(
        &self,
        channel_id: i64,
        patch: &ChannelPatch,
    ) -> Result<Channel, BackendError> {
        let channel = self.engine.api().update_channel(channel_id, patch).await?;
        info!("Updated channel {}", channel_id);
        self.engine.refresh_now().await;
        Ok(channel)
    }

    pub async fn delete_channel(&self, channel_id: i64) -> Result<(), BackendError> {
        self.engine.api().delete_channel(channel_id).await?;
        info!("Deleted channel {}", channel_id);
        self.engine.refresh_now().await;
        Ok(())
    }

    pub async fn create_playlist(&self, input: &PlaylistInput) -> Result<Playlist, BackendError> {
        let playlist = self.engine.api().create_playlist(input).await?;
        info!("Created playlist '{}'", playlist.youtube_playlist_id);
        self.engine.refresh_now().await;
        Ok(playlist)
    }

    pub async fn create_schedule(&self, input: &ScheduleInput) -> Result<Schedule, BackendError> {
        let schedule = self.engine.api().create_schedule(input).await?;
        info!(
            "Created schedule {} for playlist {}",
            schedule.id, schedule.playlist_id
        );
        self.engine.refresh_now().await;
        Ok(schedule)
    }

    pub async fn update_schedule(
        &self,
        schedule_id: i64,
        patch: &SchedulePatch,
    ) -> Result<Schedule, BackendError> {
        let schedule = self.engine.api().update_schedule(schedule_id, patch).await?;
        info!("Updated schedule {}", schedule_id);
        self.engine.refresh_now().await;
        Ok(schedule)
    }

    pub async fn delete_schedule(&self, schedule_id: i64) -> Result<(), BackendError> {
        self.engine.api().delete_schedule(schedule_id).await?;
        info!("Deleted schedule {}", schedule_id);
        self.engine.refresh_now().await;
        Ok(())
    }

    /// Record a manual run for a playlist.
    pub async fn trigger_manual_run(&self, playlist_id: i64) -> Result<RunRecord, BackendError> {
        let input = RunInput {
            playlist_id,
            status: "manual_trigger".to_string(),
            message: Some(MANUAL_RUN_MESSAGE.to_string()),
        };
        let run = self.engine.api().create_run(&input).await?;
        info!("Triggered manual run for playlist {}", playlist_id);
        self.engine.refresh_now().await;
        Ok(run)
    }

    pub async fn create_job(&self, input: &JobInput) -> Result<Job, BackendError> {
        let job = self.engine.api().create_job(input).await?;
        info!("Queued job {} for playlist {}", job.id, job.playlist_id);
        self.engine.refresh_now().await;
        Ok(job)
    }

    pub async fn update_job(&self, job_id: i64, patch: &JobPatch) -> Result<Job, BackendError> {
        let job = self.engine.api().update_job(job_id, patch).await?;
        info!("Updated job {}", job_id);
        self.engine.refresh_now().await;
        Ok(job)
    }

    pub async fn delete_job(&self, job_id: i64) -> Result<(), BackendError> {
        self.engine.api().delete_job(job_id).await?;
        info!("Deleted job {}", job_id);
        self.engine.refresh_now().await;
        Ok(())
    }

    pub async fn delete_all_jobs(&self) -> Result<(), BackendError> {
        self.engine.api().delete_all_jobs().await?;
        info!("Cleared job queue");
        self.engine.refresh_now().await;
        Ok(())
    }

    /// Create a channel and/or playlist on demand alongside a new job.
    pub async fn quick_create_job(
        &self,
        input: &QuickCreateJobInput,
    ) -> Result<QuickCreateJobResponse, BackendError> {
        let response = self.engine.api().quick_create_job(input).await?;
        info!(
            "Quick-created job {} (new channel: {}, new playlist: {})",
            response.job.id, response.created_channel, response.created_playlist
        );
        self.engine.refresh_now().await;
        Ok(response)
    }
}
