//! Shared startup for commands that do real work.

use geoscene::config::ConfigFile;
use geoscene::logging::{init_logging, WorkerGuard};
use tracing::{debug, info};

use crate::error::CliError;

/// Loaded configuration plus the logging guard for one CLI invocation.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Load the config file and install logging. `log_level` overrides the
    /// configured filter.
    pub fn new(log_level: Option<&str>) -> Result<Self, CliError> {
        let mut config = ConfigFile::load()?;
        if let Some(level) = log_level {
            config.logging.level = level.to_string();
        }

        let guard = init_logging(&config.logging)?;
        debug!(logging = ?config.logging, "Logging initialised");

        Ok(Self {
            config,
            _log_guard: guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            command,
            zoom = self.config.map.zoom,
            tile_size = self.config.map.tile_size,
            "geoscene starting"
        );
    }
}
