//! Run configuration: driver endpoint, session capabilities and timing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default Appium server endpoint
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4723";

/// Default interval between existence checks
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Default total time a locator chain may spend when a step gives no timeout
pub const DEFAULT_RESOLVE_BUDGET_MS: u64 = 10_000;

/// Polling and resolution timing shared by every step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval: Duration,
    pub resolve_budget: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            resolve_budget: Duration::from_millis(DEFAULT_RESOLVE_BUDGET_MS),
        }
    }
}

/// Complete configuration for a scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// WebDriver/Appium server URL
    pub webdriver_url: String,
    /// Capabilities sent when opening the session
    pub capabilities: serde_json::Map<String, serde_json::Value>,
    pub poll_interval_ms: u64,
    pub resolve_budget_ms: u64,
    /// Whole-scenario budget; overrides the scenario file when set
    pub budget_ms: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            capabilities: serde_json::Map::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            resolve_budget_ms: DEFAULT_RESOLVE_BUDGET_MS,
            budget_ms: None,
        }
    }
}

/// Command line values layered on top of the config file
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub webdriver_url: Option<String>,
    pub budget_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub resolve_budget_ms: Option<u64>,
}

impl RunConfig {
    /// `~/.navcheck/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".navcheck").join("config.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load from `path`, else the default location if present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.webdriver_url {
            self.webdriver_url = url;
        }
        if let Some(budget) = overrides.budget_ms {
            self.budget_ms = Some(budget);
        }
        if let Some(poll) = overrides.poll_interval_ms {
            self.poll_interval_ms = poll;
        }
        if let Some(resolve) = overrides.resolve_budget_ms {
            self.resolve_budget_ms = resolve;
        }
        self
    }

    /// Check the values that cannot be caught by deserialization
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.webdriver_url)
            .with_context(|| format!("Invalid WebDriver URL: {}", self.webdriver_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("WebDriver URL must use http or https: {}", self.webdriver_url);
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("Poll interval must be greater than zero");
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            resolve_budget: Duration::from_millis(self.resolve_budget_ms),
        }
    }
}
