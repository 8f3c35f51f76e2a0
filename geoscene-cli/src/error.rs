//! CLI error type.

use geoscene::config::ConfigError;
use geoscene::coord::CoordError;
use geoscene::logging::LoggingError;
use geoscene::render::RenderError;
use thiserror::Error;

/// Errors surfaced to the user by the `geoscene` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}
