//! Configuration file support.
//!
//! Defaults can be set in a TOML file; CLI flags override when present.
//! Priority: explicit path > `~/.config/hxe/config.toml` > built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Environment override for the profile root directory.
pub const PROFILE_ROOT_ENV: &str = "HXE_PROFILE_ROOT";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub headless: bool,
    pub node_command: String,
    pub profile_root: Option<PathBuf>,
    pub timeouts: Timeouts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    /// Page navigation timeout, seconds.
    pub navigation: u64,
    /// Network idle wait timeout, seconds.
    pub network_idle: u64,
    /// Whole Playwright process timeout, seconds.
    pub process: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: 30,
            network_idle: 10,
            process: 45,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless: true,
            node_command: "node".to_string(),
            profile_root: None,
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Loads config from an explicit path, the central location, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.exists()),
        };

        let Some(file) = candidate else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(&file)
            .map_err(|e| format!("{}: {}", file.display(), e))?;
        toml::from_str(&raw).map_err(|e| format!("{}: {}", file.display(), e))
    }

    /// `~/.config/hxe/config.toml`, if a home directory can be determined.
    pub fn central_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".config").join("hxe").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.node_command.trim().is_empty() {
            return Err("node_command must not be empty".to_string());
        }
        if self.timeouts.navigation == 0 || self.timeouts.network_idle == 0 {
            return Err("timeouts must be greater than zero".to_string());
        }
        if self.timeouts.process < self.timeouts.navigation {
            return Err(format!(
                "process timeout ({}s) must be at least the navigation timeout ({}s)",
                self.timeouts.process, self.timeouts.navigation
            ));
        }
        Ok(())
    }

    /// Profile root after applying the env override and the home default.
    pub fn resolved_profile_root(&self) -> PathBuf {
        if let Some(root) = std::env::var_os(PROFILE_ROOT_ENV) {
            return PathBuf::from(root);
        }
        if let Some(root) = &self.profile_root {
            return root.clone();
        }
        home_dir()
            .map(|home| home.join(".hxe").join("profiles"))
            .unwrap_or_else(|| PathBuf::from(".hxe/profiles"))
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.navigation)
    }

    pub fn network_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.network_idle)
    }

    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.process)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
