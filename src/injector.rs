//! Enrichment-script loading.
//!
//! The injector is a fixed piece of JavaScript executed inside the rendered
//! page before serialization. It is read once at startup; a missing file is
//! a configuration error raised before any render is attempted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{HxeError, Result};

/// Environment override for the enrichment-script path.
pub const INJECTOR_ENV: &str = "HXE_INJECTOR";

/// File name looked up next to the executable when no override is given.
const INJECTOR_FILE_NAME: &str = "injector.js";

/// The enrichment script, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Injector {
    path: PathBuf,
    script: String,
}

impl Injector {
    /// Loads the script from an explicit path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let script = fs::read_to_string(path).map_err(|_| {
            HxeError::Config(format!(
                "JavaScript injector not found at {}",
                path.display()
            ))
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            script,
        })
    }

    /// Resolves the default location and loads the script from there.
    /// Resolution order: `HXE_INJECTOR` env var, then `injector.js` next to
    /// the running executable.
    pub fn load_default() -> Result<Self> {
        Self::from_path(&default_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn script(&self) -> &str {
        &self.script
    }
}

fn default_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(INJECTOR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let exe = std::env::current_exe()
        .map_err(|e| HxeError::Config(format!("Unable to locate executable: {}", e)))?;
    let dir = exe.parent().ok_or_else(|| {
        HxeError::Config("Unable to locate executable directory for injector.js".to_string())
    })?;
    Ok(dir.join(INJECTOR_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_path_reads_script() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "(() => true)()").unwrap();
        let injector = Injector::from_path(file.path()).expect("load injector");
        assert_eq!(injector.script(), "(() => true)()");
        assert_eq!(injector.path(), file.path());
    }

    #[test]
    fn from_path_missing_file_is_config_error() {
        let err = Injector::from_path(Path::new("/tmp/no-such-injector.js")).unwrap_err();
        match err {
            HxeError::Config(msg) => {
                assert!(msg.contains("injector"), "got: {msg}");
                assert!(msg.contains("/tmp/no-such-injector.js"), "got: {msg}");
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
