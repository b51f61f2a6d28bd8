//! Tracking of the backend's singleton pipeline process.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::backend::models::PipelineStatus;
use crate::backend::{AutomationApi, BackendError};

use super::events::DashboardEvent;
use super::state::DashboardState;

/// Polls and mutates the pipeline status independently of the dashboard
/// refresh: a failed status fetch degrades the held status to unknown and
/// never takes the rest of the dashboard down with it.
pub struct PipelineStatusTracker {
    api: Arc<dyn AutomationApi>,
    state: Arc<DashboardState>,
    events: broadcast::Sender<DashboardEvent>,
}

impl PipelineStatusTracker {
    pub(crate) fn new(
        api: Arc<dyn AutomationApi>,
        state: Arc<DashboardState>,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        Self { api, state, events }
    }

    /// Poll the status resource once.
    ///
    /// On failure the held status is cleared to unknown and a transient
    /// event is emitted; the error is not propagated.
    pub async fn refresh(&self) {
        match self.api.pipeline_status().await {
            Ok(status) => self.state.set_pipeline_status(Some(status)),
            Err(err) => {
                warn!("Pipeline status poll failed: {}", err);
                self.state.set_pipeline_status(None);
                let _ = self.events.send(DashboardEvent::PipelineStatusUnavailable {
                    message: err.to_string(),
                });
            }
        }
    }

    /// One-shot start request.
    ///
    /// On success the server's acknowledgement overwrites the held status
    /// immediately and a normal re-poll reconciles afterwards. On failure
    /// the error is returned and the held status is untouched.
    pub async fn trigger(&self) -> Result<PipelineStatus, BackendError> {
        let ack = self.api.trigger_pipeline().await?;
        info!(
            "Pipeline trigger accepted (running={}, pid={:?})",
            ack.running, ack.pid
        );
        self.state.set_pipeline_status(Some(ack.clone()));
        self.refresh().await;
        Ok(ack)
    }
}
