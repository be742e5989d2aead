//! [`ConfigManager`]: the entry point the rest of the workspace loads
//! configuration through.

use std::sync::RwLock;

use tracing::info;

use crate::config_builder::ConfigOverrides;
use crate::config_builder::build_config;
use crate::env_loader::EnvLoader;
use crate::error::ConfigError;
use crate::loader;
use crate::types::Config;

/// Owns the resolved [`Config`] and can reload it on demand.
///
/// Cheap to clone-share via `Arc`; the manager itself holds an `RwLock` so
/// a reload doesn't require rebuilding every holder's reference.
#[derive(Debug)]
pub struct ConfigManager {
    config: RwLock<Config>,
    overrides: ConfigOverrides,
}

impl ConfigManager {
    /// Load configuration from `$LACE_HOME` (or `~/.lace`), applying no
    /// in-memory overrides.
    pub fn from_default() -> Result<Self, ConfigError> {
        Self::load(ConfigOverrides::default())
    }

    /// Load configuration with the given in-memory overrides layered on
    /// top of environment and file values.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let dir = loader::config_dir()?;
        let file = loader::load_file_config(&dir)?;
        let env = EnvLoader::new().load();
        let config = build_config(&overrides, &env, &file);
        info!(config_dir = %dir.display(), "configuration loaded");
        Ok(Self {
            config: RwLock::new(config),
            overrides,
        })
    }

    /// Build a manager directly from an already-resolved [`Config`],
    /// bypassing file and environment discovery. Used by tests and by
    /// embedders that manage configuration themselves.
    pub fn from_config(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            overrides: ConfigOverrides::default(),
        }
    }

    /// Snapshot the current configuration.
    pub fn current(&self) -> Config {
        #[allow(clippy::unwrap_used)]
        self.config.read().unwrap().clone()
    }

    /// Re-read the config file and environment, keeping the manager's
    /// original overrides.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let dir = loader::config_dir()?;
        let file = loader::load_file_config(&dir)?;
        let env = EnvLoader::new().load();
        let config = build_config(&self.overrides, &env, &file);
        #[allow(clippy::unwrap_used)]
        {
            *self.config.write().unwrap() = config;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "manager.test.rs"]
mod tests;
