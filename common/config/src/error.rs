//! Errors raised while loading or resolving configuration.

use lace_error::ErrorExt;
use lace_error::Location;
use lace_error::StatusCode;
use snafu::Snafu;

/// Configuration load/resolve errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ConfigError {
    /// The home directory could not be determined, and no `LACE_HOME`
    /// override was set.
    #[snafu(display("could not determine home directory"))]
    HomeDirNotFound {
        #[snafu(implicit)]
        location: Location,
    },

    /// The config file exists but failed to parse as JSON.
    #[snafu(display("invalid JSON in {path}: {source}"))]
    InvalidJson {
        path: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// The config file could not be read.
    #[snafu(display("could not read {path}: {source}"))]
    Io {
        path: String,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// A loaded value failed validation (out of range, empty where
    /// required, etc).
    #[snafu(display("invalid config: {message}"))]
    Invalid {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConfigError::HomeDirNotFound { .. } => StatusCode::InvalidConfig,
            ConfigError::InvalidJson { .. } => StatusCode::InvalidConfig,
            ConfigError::Io { .. } => StatusCode::IoError,
            ConfigError::Invalid { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
