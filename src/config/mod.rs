mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub backend_url: Option<String>,
    pub api_token: Option<String>,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub auto_refresh: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            api_token: None,
            refresh_interval_secs: 30,
            request_timeout_secs: 8,
            auto_refresh: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub api_token: Option<String>,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub auto_refresh: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let backend_url = file
            .backend_url
            .or_else(|| cli.backend_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("backend_url must be specified via --backend-url or in config file")
            })?;

        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            bail!("backend_url must be an http(s) URL: {}", backend_url);
        }

        let api_token = file.api_token.or_else(|| cli.api_token.clone());

        let refresh_interval_secs = file
            .refresh_interval_secs
            .unwrap_or(cli.refresh_interval_secs);
        if refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be greater than zero");
        }

        let request_timeout_secs = file
            .request_timeout_secs
            .unwrap_or(cli.request_timeout_secs);
        if request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }

        let auto_refresh = file.auto_refresh.unwrap_or(cli.auto_refresh);

        Ok(Self {
            backend_url,
            api_token,
            refresh_interval_secs,
            request_timeout_secs,
            auto_refresh,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
