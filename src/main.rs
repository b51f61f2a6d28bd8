use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use automation_console::backend::{AutomationApi, BackendClient};
use automation_console::config::{AppConfig, CliConfig, FileConfig};
use automation_console::dashboard::{
    playlist_label, DashboardEngine, DashboardState, EngineConfig,
};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Base URL of the automation service (e.g. http://127.0.0.1:8000).
    #[clap(long)]
    pub backend_url: Option<String>,

    /// Bearer token sent with every backend request.
    #[clap(long)]
    pub api_token: Option<String>,

    /// Path to a TOML config file; its values override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Seconds between automatic dashboard refreshes.
    #[clap(long, default_value_t = 30)]
    pub refresh_interval_secs: u64,

    /// Client-side timeout in seconds for each backend request.
    #[clap(long, default_value_t = 8)]
    pub request_timeout_secs: u64,

    /// Start with the automatic refresh timer disabled.
    #[clap(long)]
    pub no_auto_refresh: bool,

    /// Perform a single synchronization, print the summary and exit.
    #[clap(long)]
    pub once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "automation-console {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        backend_url: cli_args.backend_url.clone(),
        api_token: cli_args.api_token.clone(),
        refresh_interval_secs: cli_args.refresh_interval_secs,
        request_timeout_secs: cli_args.request_timeout_secs,
        auto_refresh: !cli_args.no_auto_refresh,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Connecting to automation service at {}", config.backend_url);
    let api: Arc<dyn AutomationApi> = Arc::new(BackendClient::new(
        config.backend_url.clone(),
        config.request_timeout_secs,
        config.api_token.clone(),
    ));

    let engine = DashboardEngine::new(
        api,
        EngineConfig {
            refresh_interval: config.refresh_interval(),
        },
    );
    let state = engine.state();
    let mut events = engine.subscribe_events();
    let mut changed = state.subscribe();

    engine.refresh_now().await;
    log_summary(&state);
    let _ = changed.borrow_and_update();

    if cli_args.once {
        return match state.last_error() {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        };
    }

    engine.set_auto_refresh(config.auto_refresh);
    info!("Console running; press Ctrl-C to exit");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => info!("{}", event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Dropped {} dashboard events", missed);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            result = changed.changed() => {
                if result.is_err() {
                    break;
                }
                log_summary(&state);
            }
        }
    }

    engine.set_auto_refresh(false);
    Ok(())
}

/// Log a one-screen summary of the current dashboard state.
fn log_summary(state: &DashboardState) {
    if let Some(message) = state.last_error() {
        error!("Dashboard refresh failed: {}", message);
    }

    let Some(view) = state.view() else {
        warn!("No dashboard data yet");
        return;
    };

    let job_count = state
        .snapshot()
        .map(|snapshot| snapshot.jobs.len())
        .unwrap_or(0);
    info!(
        "{} channels, {} playlists, {} jobs queued",
        view.channels.len(),
        view.playlist_count(),
        job_count
    );

    for node in &view.channels {
        info!(
            "  [{}] {} ({} playlists)",
            node.channel.slug,
            node.channel.title,
            node.playlists.len()
        );
        for playlist_node in &node.playlists {
            info!(
                "    - {} ({} schedules, {} recent runs)",
                playlist_label(&playlist_node.playlist),
                playlist_node.schedules.len(),
                playlist_node.recent_runs.len()
            );
        }
    }

    match state.pipeline_status() {
        Some(status) if status.running => {
            info!(
                "Pipeline running (pid {})",
                status
                    .pid
                    .map(|pid| pid.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        Some(status) => {
            info!(
                "Pipeline idle (last exit code {})",
                status
                    .last_exit_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        None => info!("Pipeline status unknown"),
    }
}
