//! Locates and parses `config.json`.

use std::path::Path;
use std::path::PathBuf;

use snafu::ResultExt;
use tracing::debug;

use crate::error::ConfigError;
use crate::error::config_error::HomeDirNotFoundSnafu;
use crate::error::config_error::InvalidJsonSnafu;
use crate::error::config_error::IoSnafu;
use crate::file_config::FileConfig;

/// Default config directory name under the user's home directory.
pub const DEFAULT_CONFIG_DIR: &str = ".lace";

/// Config file name within the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the config directory.
pub const LACE_HOME_ENV: &str = "LACE_HOME";

/// Resolve the config directory: `$LACE_HOME` if set, else `~/.lace`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(custom) = std::env::var(LACE_HOME_ENV) {
        return Ok(PathBuf::from(custom));
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_CONFIG_DIR))
        .ok_or_else(|| HomeDirNotFoundSnafu.build())
}

/// Read and parse `config.json` from `dir`. Returns the default (empty)
/// [`FileConfig`] if the file does not exist; a missing config file is not
/// an error, an unparseable one is.
pub fn load_file_config(dir: &Path) -> Result<FileConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(FileConfig::default());
    }
    let raw = std::fs::read_to_string(&path).context(IoSnafu {
        path: path.display().to_string(),
    })?;
    serde_json::from_str(&raw).context(InvalidJsonSnafu {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
#[path = "loader.test.rs"]
mod tests;
