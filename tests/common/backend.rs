//! In-process mock of the automation service.
//!
//! Serves the same routes and JSON shapes as the real backend, with switches
//! to simulate per-collection failures, mutation rejections and bearer-token
//! enforcement. Every request is recorded for assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, Request, State};
use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use automation_console::backend::models::{
    Channel, Job, PipelineStatus, Playlist, PodcastTarget, QuickCreateJobResponse, RunRecord,
    Schedule,
};
use automation_console::backend::{AutomationApi, BackendClient};
use automation_console::dashboard::{DashboardEngine, EngineConfig};

use super::fixtures::idle_pipeline;

/// Mutable world state behind the mock routes.
pub struct MockState {
    pub channels: Vec<Channel>,
    pub playlists: Vec<Playlist>,
    pub schedules: Vec<Schedule>,
    pub runs: Vec<RunRecord>,
    pub jobs: Vec<Job>,
    pub podcasts: Vec<PodcastTarget>,
    pub pipeline: PipelineStatus,
    pub next_id: i64,

    pub fail_channels: bool,
    pub fail_playlists: bool,
    pub fail_schedules: bool,
    pub fail_runs: bool,
    pub fail_jobs: bool,
    pub fail_pipeline: bool,
    /// When set, every mutation is rejected with this status and detail.
    pub reject_mutations: Option<(u16, String)>,
    /// When set, requests without this bearer token get a 401.
    pub required_token: Option<String>,

    pub request_log: Vec<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            playlists: Vec::new(),
            schedules: Vec::new(),
            runs: Vec::new(),
            jobs: Vec::new(),
            podcasts: Vec::new(),
            pipeline: idle_pipeline(),
            next_id: 1000,
            fail_channels: false,
            fail_playlists: false,
            fail_schedules: false,
            fail_runs: false,
            fail_jobs: false,
            fail_pipeline: false,
            reject_mutations: None,
            required_token: None,
            request_log: Vec::new(),
        }
    }
}

impl MockState {
    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

type Shared = Arc<Mutex<MockState>>;

/// Mock automation service listening on a random local port.
///
/// The server task is aborted on drop.
pub struct MockBackend {
    pub base_url: String,
    state: Shared,
    token: Option<String>,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        Self::spawn_with(MockState::default()).await
    }

    pub async fn spawn_with(state: MockState) -> Self {
        let token = state.required_token.clone();
        let shared: Shared = Arc::new(Mutex::new(state));

        let app = router(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr = listener.local_addr().expect("mock backend has no address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend died");
        });

        Self {
            base_url: format!("http://{}", addr),
            state: shared,
            token,
            server,
        }
    }

    /// Direct access to the world state for seeding and assertions.
    pub fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn request_log(&self) -> Vec<String> {
        self.lock().request_log.clone()
    }

    pub fn clear_request_log(&self) {
        self.lock().request_log.clear();
    }

    /// Real HTTP client pointed at this mock, using the configured token.
    pub fn client(&self) -> Arc<dyn AutomationApi> {
        Arc::new(BackendClient::new(
            self.base_url.clone(),
            8,
            self.token.clone(),
        ))
    }

    pub fn engine(&self) -> Arc<DashboardEngine> {
        self.engine_with(EngineConfig::default())
    }

    pub fn engine_with(&self, config: EngineConfig) -> Arc<DashboardEngine> {
        DashboardEngine::new(self.client(), config)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/channels/", get(list_channels).post(create_channel))
        .route(
            "/channels/{id}",
            axum::routing::patch(update_channel).delete(delete_channel),
        )
        .route("/playlists/", get(list_playlists).post(create_playlist))
        .route("/schedules/", get(list_schedules).post(create_schedule))
        .route(
            "/schedules/{id}",
            axum::routing::patch(update_schedule).delete(delete_schedule),
        )
        .route("/runs/", get(list_runs).post(create_run))
        .route(
            "/jobs/",
            get(list_jobs).post(create_job).delete(delete_all_jobs),
        )
        .route("/jobs/quick-create", post(quick_create_job))
        .route(
            "/jobs/{id}",
            axum::routing::patch(update_job).delete(delete_job),
        )
        .route("/pipeline/status", get(pipeline_status))
        .route("/pipeline/trigger", post(trigger_pipeline))
        .route("/castopod/podcasts", get(list_podcasts))
        .layer(middleware::from_fn_with_state(shared.clone(), track_request))
        .with_state(shared)
}

async fn track_request(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let line = format!(
        "{} {}",
        req.method(),
        req.uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string())
    );
    let auth = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    {
        let mut state = state.lock().unwrap();
        state.request_log.push(line);
        if let Some(token) = &state.required_token {
            let expected = format!("Bearer {}", token);
            if auth.as_deref() != Some(expected.as_str()) {
                return error_response(StatusCode::UNAUTHORIZED, "Not authenticated");
            }
        }
    }

    next.run(req).await
}

fn error_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn mutation_rejection(state: &MockState) -> Option<Response> {
    state.reject_mutations.as_ref().map(|(code, detail)| {
        let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_REQUEST);
        error_response(status, detail)
    })
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

async fn list_channels(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail_channels {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "channels unavailable");
    }
    Json(state.channels.clone()).into_response()
}

async fn create_channel(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let id = state.take_id();
    let channel = Channel {
        id,
        slug: body["slug"].as_str().unwrap_or_default().to_string(),
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().map(str::to_string),
    };
    state.channels.push(channel.clone());
    (StatusCode::CREATED, Json(channel)).into_response()
}

async fn update_channel(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let Some(channel) = state.channels.iter_mut().find(|channel| channel.id == id) else {
        return error_response(StatusCode::NOT_FOUND, "Channel not found");
    };
    if let Some(title) = body["title"].as_str() {
        channel.title = title.to_string();
    }
    if let Some(description) = body["description"].as_str() {
        channel.description = Some(description.to_string());
    }
    Json(channel.clone()).into_response()
}

async fn delete_channel(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    state.channels.retain(|channel| channel.id != id);
    state.playlists.retain(|playlist| playlist.channel_id != id);
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// Playlists
// ---------------------------------------------------------------------------

async fn list_playlists(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail_playlists {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "playlists unavailable");
    }
    Json(state.playlists.clone()).into_response()
}

async fn create_playlist(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let id = state.take_id();
    let playlist = Playlist {
        id,
        channel_id: body["channel_id"].as_i64().unwrap_or_default(),
        youtube_playlist_id: body["youtube_playlist_id"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        title: body["title"].as_str().map(str::to_string),
        is_active: body["is_active"].as_bool().unwrap_or(true),
        castopod_slug: body["castopod_slug"].as_str().map(str::to_string),
        castopod_uuid: body["castopod_uuid"].as_str().map(str::to_string),
    };
    state.playlists.push(playlist.clone());
    (StatusCode::CREATED, Json(playlist)).into_response()
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

async fn list_schedules(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail_schedules {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "schedules unavailable");
    }
    Json(state.schedules.clone()).into_response()
}

async fn create_schedule(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let id = state.take_id();
    let schedule = Schedule {
        id,
        playlist_id: body["playlist_id"].as_i64().unwrap_or_default(),
        days_of_week: body["days_of_week"]
            .as_array()
            .map(|days| {
                days.iter()
                    .filter_map(|day| day.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        run_time: body["run_time"].as_str().unwrap_or("00:00").to_string(),
        timezone: body["timezone"].as_str().unwrap_or("UTC").to_string(),
        is_active: body["is_active"].as_bool().unwrap_or(true),
        next_run_at: None,
        last_run_at: None,
    };
    state.schedules.push(schedule.clone());
    (StatusCode::CREATED, Json(schedule)).into_response()
}

async fn update_schedule(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let Some(schedule) = state
        .schedules
        .iter_mut()
        .find(|schedule| schedule.id == id)
    else {
        return error_response(StatusCode::NOT_FOUND, "Schedule not found");
    };
    if let Some(run_time) = body["run_time"].as_str() {
        schedule.run_time = run_time.to_string();
    }
    if let Some(timezone) = body["timezone"].as_str() {
        schedule.timezone = timezone.to_string();
    }
    if let Some(is_active) = body["is_active"].as_bool() {
        schedule.is_active = is_active;
    }
    Json(schedule.clone()).into_response()
}

async fn delete_schedule(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    state.schedules.retain(|schedule| schedule.id != id);
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

async fn list_runs(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().unwrap();
    if state.fail_runs {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "runs unavailable");
    }
    let limit = params
        .get("limit")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    let runs: Vec<RunRecord> = state.runs.iter().take(limit).cloned().collect();
    Json(runs).into_response()
}

async fn create_run(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let id = state.take_id();
    let run = RunRecord {
        id,
        playlist_id: body["playlist_id"].as_i64().unwrap_or_default(),
        status: body["status"].as_str().unwrap_or("pending").to_string(),
        message: body["message"].as_str().map(str::to_string),
        started_at: MockState::now(),
        finished_at: None,
        progress_total: 0,
        progress_completed: 0,
        current_task: None,
        progress_message: None,
    };
    state.runs.insert(0, run.clone());
    (StatusCode::CREATED, Json(run)).into_response()
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

async fn list_jobs(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail_jobs {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "jobs unavailable");
    }
    Json(state.jobs.clone()).into_response()
}

async fn create_job(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let job = build_job(&mut state, &body);
    state.jobs.push(job.clone());
    (StatusCode::CREATED, Json(job)).into_response()
}

fn build_job(state: &mut MockState, body: &Value) -> Job {
    let id = state.take_id();
    Job {
        id,
        playlist_id: body["playlist_id"].as_i64().unwrap_or_default(),
        action: body["action"].as_str().unwrap_or("sync").to_string(),
        status: body["status"].as_str().unwrap_or("queued").to_string(),
        castopod_slug: body["castopod_slug"].as_str().map(str::to_string),
        castopod_playlist_uuid: body["castopod_playlist_uuid"].as_str().map(str::to_string),
        note: body["note"].as_str().map(str::to_string),
        should_castopod_upload: body["should_castopod_upload"].as_bool().unwrap_or(false),
        progress_total: 0,
        progress_completed: 0,
        current_task: None,
        progress_message: None,
        created_at: MockState::now(),
        updated_at: MockState::now(),
    }
}

async fn update_job(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    let Some(job) = state.jobs.iter_mut().find(|job| job.id == id) else {
        return error_response(StatusCode::NOT_FOUND, "Job not found");
    };
    if let Some(status) = body["status"].as_str() {
        job.status = status.to_string();
    }
    if let Some(note) = body["note"].as_str() {
        job.note = Some(note.to_string());
    }
    job.updated_at = MockState::now();
    Json(job.clone()).into_response()
}

async fn delete_job(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    state.jobs.retain(|job| job.id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_all_jobs(State(state): State<Shared>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }
    state.jobs.clear();
    StatusCode::NO_CONTENT.into_response()
}

async fn quick_create_job(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = mutation_rejection(&state) {
        return rejection;
    }

    let job_name = body["job_name"].as_str().unwrap_or_default().to_string();
    let slug = job_name.to_lowercase().replace(' ', "-");

    let existing_channel = state
        .channels
        .iter()
        .position(|channel| channel.slug == slug);
    let (channel, created_channel) = match existing_channel {
        Some(index) => (state.channels[index].clone(), false),
        None => {
            let id = state.take_id();
            let channel = Channel {
                id,
                slug,
                title: job_name.clone(),
                description: body["channel_description"].as_str().map(str::to_string),
            };
            state.channels.push(channel.clone());
            (channel, true)
        }
    };

    let source_id = body["youtube_playlist"].as_str().unwrap_or_default();
    let existing_playlist = state
        .playlists
        .iter()
        .position(|playlist| playlist.youtube_playlist_id == source_id);
    let (playlist, created_playlist) = match existing_playlist {
        Some(index) => (state.playlists[index].clone(), false),
        None => {
            let id = state.take_id();
            let playlist = Playlist {
                id,
                channel_id: channel.id,
                youtube_playlist_id: source_id.to_string(),
                title: Some(job_name),
                is_active: true,
                castopod_slug: body["castopod_slug"].as_str().map(str::to_string),
                castopod_uuid: body["castopod_uuid"].as_str().map(str::to_string),
            };
            state.playlists.push(playlist.clone());
            (playlist, true)
        }
    };

    let job_body = json!({
        "playlist_id": playlist.id,
        "note": body["note"],
        "should_castopod_upload": body["should_castopod_upload"],
    });
    let job = build_job(&mut state, &job_body);
    state.jobs.push(job.clone());

    let response = QuickCreateJobResponse {
        channel,
        playlist,
        job,
        created_channel,
        created_playlist,
    };
    (StatusCode::CREATED, Json(response)).into_response()
}

// ---------------------------------------------------------------------------
// Pipeline and publishing catalog
// ---------------------------------------------------------------------------

async fn pipeline_status(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail_pipeline {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "pipeline unavailable");
    }
    Json(state.pipeline.clone()).into_response()
}

async fn trigger_pipeline(State(state): State<Shared>) -> Response {
    let mut state = state.lock().unwrap();
    if state.pipeline.running {
        return error_response(StatusCode::CONFLICT, "Pipeline is already running");
    }
    state.pipeline.running = true;
    state.pipeline.pid = Some(4321);
    state.pipeline.started_at = Some(MockState::now());
    (StatusCode::ACCEPTED, Json(state.pipeline.clone())).into_response()
}

async fn list_podcasts(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    Json(state.podcasts.clone()).into_response()
}
