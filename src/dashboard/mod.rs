//! Dashboard synchronization and view-model engine.
//!
//! The engine periodically pulls the resource collections from the backend,
//! joins them into a hierarchical view model, tracks the pipeline process on
//! an independent call, announces jobs inferred to be scheduler-created, and
//! routes every mutation through a reload-on-success gateway.

mod engine;
mod events;
mod mutations;
mod notifier;
mod pipeline;
mod snapshot;
mod state;
mod view_model;

pub use engine::{DashboardEngine, EngineConfig};
pub use events::DashboardEvent;
pub use mutations::MutationGateway;
pub use notifier::{
    ScheduleJobAlert, ScheduleJobNotifier, SCHEDULE_JOB_RECENCY_SECS, SCHEDULE_NOTE_MARKERS,
};
pub use pipeline::PipelineStatusTracker;
pub use snapshot::{fetch_snapshot, DashboardSnapshot, RUNS_FETCH_LIMIT};
pub use state::DashboardState;
pub use view_model::{join, playlist_label, ChannelNode, DashboardViewModel, PlaylistNode};
