use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::review::{ReviewHistory, ReviewPolicy, UndoTarget, DEFAULT_MIN_REASON_LENGTH};

/// Main configuration structure for TerraPrice review tooling
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TerraPriceConfig {
    /// Hosted backend connection
    pub backend: BackendConfig,
    /// Review workflow settings
    pub review: ReviewConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL of the hosted backend
    pub url: Option<String>,
    /// Anon or service key (can be set via env var)
    pub api_key: Option<String>,
    /// Table holding floorplan submissions
    pub table: String,
    pub requests_per_second: u32,
    pub burst_capacity: u32,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: "floorplan_submissions".to_string(),
            requests_per_second: 10,
            burst_capacity: 20,
            request_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Minimum length of a free-text denial reason
    pub min_reason_length: usize,
    /// Entries kept in the recent-actions buffer
    pub history_capacity: usize,
    /// Where undo sends a decided submission
    pub undo_target: UndoTarget,
    /// Refuse overlapping transitions on the same submission
    pub serialize_per_record: bool,
    /// Abandon remote review calls after this long (none when unset)
    pub remote_timeout_ms: Option<u64>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            min_reason_length: DEFAULT_MIN_REASON_LENGTH,
            history_capacity: ReviewHistory::DEFAULT_CAPACITY,
            undo_target: UndoTarget::Pending,
            serialize_per_record: false,
            remote_timeout_ms: None,
        }
    }
}

impl ReviewConfig {
    pub fn policy(&self) -> ReviewPolicy {
        ReviewPolicy {
            min_reason_length: self.min_reason_length,
            history_capacity: self.history_capacity,
            undo_target: self.undo_target,
            serialize_per_record: self.serialize_per_record,
            remote_timeout: self.remote_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TerraPriceConfig {
    pub const FILE_NAME: &'static str = "terraprice.toml";

    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (terraprice.toml in the working directory)
    /// 3. Environment variables (prefixed with TERRAPRICE__)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Same as `load`, reading the configuration file from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TERRAPRICE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut terraprice_config: TerraPriceConfig = builder.build()?.try_deserialize()?;

        // The hosted backend's own variable names work too
        if terraprice_config.backend.url.is_none() {
            terraprice_config.backend.url = std::env::var("SUPABASE_URL").ok();
        }
        if terraprice_config.backend.api_key.is_none() {
            terraprice_config.backend.api_key = std::env::var("SUPABASE_ANON_KEY").ok();
        }

        Ok(terraprice_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
