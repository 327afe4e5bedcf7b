//! Service configuration, loaded from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock service: YouTube excluded, `HEAD` then `GET bytes=0-0`.

use std::fs;
use std::path::{Path, PathBuf};

use linkprobe_core::{ExclusionList, ExclusionRule, PlanError, ProbePlan, ProbeStrategy, Validator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("probe.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("exclusion rule for {0} has no host patterns")]
    EmptyExclusion(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ListenConfig,
    pub probe: ProbeConfig,
    pub exclusions: Vec<ExclusionRule>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ListenConfig::default(),
            probe: ProbeConfig::default(),
            exclusions: ExclusionList::default().rules().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Outbound probe settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Total time allowed for one probe, redirects included.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_redirects: usize,
    /// Whether a transport failure moves on to the next strategy.
    pub fallback_on_error: bool,
    pub strategies: Vec<ProbeStrategy>,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 10,
            max_redirects: 10,
            fallback_on_error: true,
            strategies: ProbePlan::default().strategies().to_vec(),
            user_agent: concat!("linkprobe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(data: &str) -> Result<Self, ConfigError> {
        let cfg: ServerConfig = toml::from_str(data)?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Reject settings that would make every probe fail or every rule inert.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.probe.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("timeout_secs"));
        }
        if self.probe.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("connect_timeout_secs"));
        }
        if let Some(rule) = self
            .exclusions
            .iter()
            .find(|r| r.host_patterns.iter().all(|p| p.trim().is_empty()))
        {
            return Err(ConfigError::EmptyExclusion(rule.platform.clone()));
        }
        self.probe_plan()?;
        Ok(())
    }

    pub fn probe_plan(&self) -> Result<ProbePlan, ConfigError> {
        Ok(ProbePlan::new(
            self.probe.strategies.clone(),
            self.probe.fallback_on_error,
        )?)
    }

    pub fn validator(&self) -> Result<Validator, ConfigError> {
        let exclusions = ExclusionList::new(
            self.exclusions
                .iter()
                .map(|r| ExclusionRule {
                    platform: r.platform.clone(),
                    host_patterns: r
                        .host_patterns
                        .iter()
                        .map(|p| p.trim().to_ascii_lowercase())
                        .filter(|p| !p.is_empty())
                        .collect(),
                })
                .collect(),
        );
        Ok(Validator::new(exclusions, self.probe_plan()?))
    }
}

/// Load configuration from `path`, or use the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ServerConfig::default());
    };
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = ServerConfig::from_toml(&data)?;
    tracing::info!("loaded config from {}", path.display());
    Ok(cfg)
}
