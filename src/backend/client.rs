//! HTTP client for the automation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{extract_detail, BackendError};
use super::models::{
    Channel, ChannelInput, ChannelPatch, Job, JobInput, JobPatch, PipelineStatus, Playlist,
    PlaylistInput, PodcastTarget, QuickCreateJobInput, QuickCreateJobResponse, RunInput, RunRecord,
    Schedule, ScheduleInput, SchedulePatch,
};
use super::AutomationApi;

/// HTTP client for communicating with the automation service.
///
/// One shared connection pool; every request is bounded by the configured
/// client-side timeout and carries the bearer token when one is set.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the automation service (e.g., "http://127.0.0.1:8000")
    /// * `timeout_secs` - Per-request timeout in seconds
    /// * `api_token` - Optional bearer token sent on every request
    pub fn new(base_url: String, timeout_secs: u64, api_token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            api_token,
        }
    }

    /// Get the base URL of the automation service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a prepared request and classify the outcome.
    ///
    /// Non-success statuses are turned into `BackendError::Status` with the
    /// backend's `detail` payload extracted when present.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, BackendError> {
        let response = builder.send().await.map_err(|source| BackendError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            url: url.to_string(),
            status,
            detail: extract_detail(&body),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        let response = self.send(self.request(Method::GET, &url), &url).await?;
        response
            .json()
            .await
            .map_err(|source| BackendError::Decode { url, source })
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = self.url(path);
        let response = self
            .send(self.request(method, &url).json(body), &url)
            .await?;
        response
            .json()
            .await
            .map_err(|source| BackendError::Decode { url, source })
    }

    /// Issue a request whose success response carries no body (deletes).
    async fn send_no_content(&self, method: Method, path: &str) -> Result<(), BackendError> {
        let url = self.url(path);
        self.send(self.request(method, &url), &url).await?;
        Ok(())
    }
}

#[async_trait]
impl AutomationApi for BackendClient {
    async fn list_channels(&self) -> Result<Vec<Channel>, BackendError> {
        self.get_json("/channels/").await
    }

    async fn create_channel(&self, input: &ChannelInput) -> Result<Channel, BackendError> {
        self.send_json(Method::POST, "/channels/", input).await
    }

    async fn update_channel(
        &self,
        channel_id: i64,
        patch: &ChannelPatch,
    ) -> Result<Channel, BackendError> {
        self.send_json(Method::PATCH, &format!("/channels/{}", channel_id), patch)
            .await
    }

    async fn delete_channel(&self, channel_id: i64) -> Result<(), BackendError> {
        self.send_no_content(Method::DELETE, &format!("/channels/{}", channel_id))
            .await
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>, BackendError> {
        self.get_json("/playlists/").await
    }

    async fn create_playlist(&self, input: &PlaylistInput) -> Result<Playlist, BackendError> {
        self.send_json(Method::POST, "/playlists/", input).await
    }

    async fn list_schedules(&self) -> Result<Vec<Schedule>, BackendError> {
        self.get_json("/schedules/").await
    }

    async fn create_schedule(&self, input: &ScheduleInput) -> Result<Schedule, BackendError> {
        self.send_json(Method::POST, "/schedules/", input).await
    }

    async fn update_schedule(
        &self,
        schedule_id: i64,
        patch: &SchedulePatch,
    ) -> Result<Schedule, BackendError> {
        self.send_json(Method::PATCH, &format!("/schedules/{}", schedule_id), patch)
            .await
    }

    async fn delete_schedule(&self, schedule_id: i64) -> Result<(), BackendError> {
        self.send_no_content(Method::DELETE, &format!("/schedules/{}", schedule_id))
            .await
    }

    async fn list_runs(&self, limit: usize) -> Result<Vec<RunRecord>, BackendError> {
        self.get_json(&format!("/runs/?limit={}", limit)).await
    }

    async fn create_run(&self, input: &RunInput) -> Result<RunRecord, BackendError> {
        self.send_json(Method::POST, "/runs/", input).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, BackendError> {
        self.get_json("/jobs/").await
    }

    async fn create_job(&self, input: &JobInput) -> Result<Job, BackendError> {
        self.send_json(Method::POST, "/jobs/", input).await
    }

    async fn update_job(&self, job_id: i64, patch: &JobPatch) -> Result<Job, BackendError> {
        self.send_json(Method::PATCH, &format!("/jobs/{}", job_id), patch)
            .await
    }

    async fn delete_job(&self, job_id: i64) -> Result<(), BackendError> {
        self.send_no_content(Method::DELETE, &format!("/jobs/{}", job_id))
            .await
    }

    async fn delete_all_jobs(&self) -> Result<(), BackendError> {
        self.send_no_content(Method::DELETE, "/jobs/").await
    }

    async fn quick_create_job(
        &self,
        input: &QuickCreateJobInput,
    ) -> Result<QuickCreateJobResponse, BackendError> {
        self.send_json(Method::POST, "/jobs/quick-create", input)
            .await
    }

    async fn pipeline_status(&self) -> Result<PipelineStatus, BackendError> {
        self.get_json("/pipeline/status").await
    }

    async fn trigger_pipeline(&self) -> Result<PipelineStatus, BackendError> {
        let url = self.url("/pipeline/trigger");
        let response = self.send(self.request(Method::POST, &url), &url).await?;
        response
            .json()
            .await
            .map_err(|source| BackendError::Decode { url, source })
    }

    async fn list_podcast_targets(&self) -> Result<Vec<PodcastTarget>, BackendError> {
        self.get_json("/castopod/podcasts").await
    }
}
