use std::path::{Path, PathBuf};

use hxe_lib::{Config, HxeError};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct ExtractFlagSources {
    pub no_headless: bool,
    pub nav_timeout: bool,
    pub network_idle_timeout: bool,
    pub process_timeout: bool,
}

impl ExtractFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            no_headless: flag_present(args, "--no-headless"),
            nav_timeout: flag_present(args, "--nav-timeout"),
            network_idle_timeout: flag_present(args, "--network-idle-timeout"),
            process_timeout: flag_present(args, "--process-timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone)]
pub struct ResolvedExtractSettings {
    pub headless: bool,
    pub node_command: String,
    pub profile_root: PathBuf,
    pub nav_timeout: u64,
    pub network_idle_timeout: u64,
    pub process_timeout: u64,
}

/// Merge CLI arguments with the config file, preferring CLI when flags were
/// actually present on the command line.
pub fn resolve_extract_settings(
    cli_no_headless: bool,
    cli_nav_timeout: u64,
    cli_network_idle_timeout: u64,
    cli_process_timeout: u64,
    config: &Config,
    flags: &ExtractFlagSources,
) -> ResolvedExtractSettings {
    ResolvedExtractSettings {
        headless: if flags.no_headless {
            !cli_no_headless
        } else {
            config.headless
        },
        node_command: config.node_command.clone(),
        profile_root: config.resolved_profile_root(),
        nav_timeout: if flags.nav_timeout {
            cli_nav_timeout
        } else {
            config.timeouts.navigation
        },
        network_idle_timeout: if flags.network_idle_timeout {
            cli_network_idle_timeout
        } else {
            config.timeouts.network_idle
        },
        process_timeout: if flags.process_timeout {
            cli_process_timeout
        } else {
            config.timeouts.process
        },
    }
}

/// Load config from a TOML file, the central config, or defaults.
/// Priority: explicit path > ~/.config/hxe/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, HxeError> {
    let cfg = Config::load(path).map_err(|e| HxeError::Config(format!("Failed to read config {}", e)))?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        HxeError::Config(prefix)
    })?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hxe_lib::config::Timeouts;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_present_matches_exact_and_assignment_forms() {
        let raw = args(&["hxe", "extract", "--nav-timeout=20", "--no-headless"]);
        assert!(flag_present(&raw, "--nav-timeout"));
        assert!(flag_present(&raw, "--no-headless"));
        assert!(!flag_present(&raw, "--process-timeout"));
    }

    #[test]
    fn resolve_prefers_config_when_flags_absent() {
        let config = Config {
            headless: false,
            timeouts: Timeouts {
                navigation: 20,
                network_idle: 5,
                process: 40,
            },
            ..Config::default()
        };
        let flags = ExtractFlagSources::default();
        let resolved = resolve_extract_settings(false, 30, 10, 45, &config, &flags);

        assert!(!resolved.headless);
        assert_eq!(resolved.nav_timeout, 20);
        assert_eq!(resolved.network_idle_timeout, 5);
        assert_eq!(resolved.process_timeout, 40);
    }

    #[test]
    fn resolve_prefers_cli_when_flags_present() {
        let config = Config {
            headless: false,
            timeouts: Timeouts {
                navigation: 20,
                network_idle: 5,
                process: 40,
            },
            ..Config::default()
        };
        let flags = ExtractFlagSources {
            no_headless: true,
            nav_timeout: true,
            network_idle_timeout: true,
            process_timeout: true,
        };
        let resolved = resolve_extract_settings(true, 15, 4, 60, &config, &flags);

        assert!(!resolved.headless);
        assert_eq!(resolved.nav_timeout, 15);
        assert_eq!(resolved.network_idle_timeout, 4);
        assert_eq!(resolved.process_timeout, 60);
    }

    #[test]
    fn load_config_defaults_when_no_file() {
        // No explicit path; central config may not exist, which is fine.
        let cfg = load_config(None).expect("defaults");
        assert_eq!(cfg.node_command, "node");
    }

    #[test]
    fn load_config_rejects_invalid_timeouts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hxe.toml");
        std::fs::write(&path, "[timeouts]\nnavigation = 0\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, HxeError::Config(_)));
    }
}
