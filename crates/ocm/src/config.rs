//! Run configuration
//!
//! # Hierarchy
//!
//! Configuration is resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. A TOML file or string ([`RunConfig::load`], [`RunConfig::from_toml_str`])
//! 3. Environment variables: `OCM_*` ([`RunConfig::with_env_overrides`])
//!
//! # Example Config
//!
//! ```toml
//! check_installed = true
//! log_output = false
//! working_dir = "/srv/data"
//!
//! [env]
//! LC_ALL = "C"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Disable or enable the `PATH` lookup before spawning.
pub const ENV_CHECK_INSTALLED: &str = "OCM_CHECK_INSTALLED";
/// Disable or enable logging of each stdout line.
pub const ENV_LOG_OUTPUT: &str = "OCM_LOG_OUTPUT";
/// Directory to run commands in.
pub const ENV_WORKING_DIR: &str = "OCM_WORKING_DIR";

/// How [`SystemExecutor`](crate::SystemExecutor) runs processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Fail with `NotInstalled` when the program is not on `PATH`
    pub check_installed: bool,
    /// Log every stdout line at info level while the process runs
    pub log_output: bool,
    /// Working directory for the process; inherits the caller's when unset
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables, added to the inherited environment
    pub env: BTreeMap<String, String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            check_installed: true,
            log_output: true,
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

impl RunConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        tracing::debug!("Loaded run config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Defaults with `OCM_*` environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `OCM_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CHECK_INSTALLED) {
            self.check_installed = parse_bool(ENV_CHECK_INSTALLED, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_OUTPUT) {
            self.log_output = parse_bool(ENV_LOG_OUTPUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_WORKING_DIR) {
            self.working_dir = Some(PathBuf::from(raw)).filter(|dir| !dir.as_os_str().is_empty());
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn check_installed(mut self, enabled: bool) -> Self {
        self.check_installed = enabled;
        self
    }

    #[must_use]
    pub const fn log_output(mut self, enabled: bool) -> Self {
        self.log_output = enabled;
        self
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "Invalid value for {key}: {raw}. Must be one of: true, false, 1, 0, yes, no, on, off"
        ))),
    }
}
