use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::LevelFilter;
use scrape_engine::{
    EngineConfig, ExportSettings, ServerEndpoints, TransportSettings, DEFAULT_CSV_FILENAME,
};
use serde::{Deserialize, Serialize};

use super::cli::Args;

pub const DEFAULT_CONFIG_FILENAME: &str = "scrape_client.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
    pub csv_filename: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    /// Longest panel text printed to the terminal, in bytes.
    pub panel_preview_bytes: usize,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            output_dir: PathBuf::from("."),
            csv_filename: DEFAULT_CSV_FILENAME.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            panel_preview_bytes: 2_000,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// The explicit file if given, else `default_path` when it exists.
    pub fn locate(explicit: Option<&Path>, default_path: &Path) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None if default_path.is_file() => Some(default_path.to_path_buf()),
            None => None,
        }
    }

    /// Read `path`, or fall back to defaults when there is none.
    ///
    /// Runs before logging is installed, so it reports nothing itself.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        ron::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(server) = &args.server {
            self.server_url = server.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if args.verbose {
            self.log_level = "debug".to_string();
        }
    }

    pub fn level_filter(&self) -> anyhow::Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow!("invalid log level {:?}", self.log_level))
    }

    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let endpoints = ServerEndpoints::parse(&self.server_url)
            .with_context(|| format!("invalid server url {:?}", self.server_url))?;
        Ok(EngineConfig {
            endpoints,
            transport: TransportSettings {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            },
            export: ExportSettings {
                output_dir: self.output_dir.clone(),
                filename: self.csv_filename.clone(),
            },
        })
    }
}
