//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use super::{parse_value, ConfigError, ConfigFile};
use crate::coord::MAX_ZOOM;
use crate::render::Color;

/// A single setting, addressable from the command line as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    MapZoom,
    MapTileSize,
    RenderWidth,
    RenderHeight,
    RenderBackground,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::MapZoom,
            ConfigKey::MapTileSize,
            ConfigKey::RenderWidth,
            ConfigKey::RenderHeight,
            ConfigKey::RenderBackground,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::MapZoom => "map.zoom",
            ConfigKey::MapTileSize => "map.tile_size",
            ConfigKey::RenderWidth => "render.width",
            ConfigKey::RenderHeight => "render.height",
            ConfigKey::RenderBackground => "render.background",
            ConfigKey::LoggingLevel => "logging.level",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    pub fn section(&self) -> &'static str {
        self.split().0
    }

    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        let name = self.name();
        name.split_once('.').unwrap_or((name, ""))
    }

    /// Current value as it would be written to the file. Unset optional
    /// values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::MapZoom => config.map.zoom.to_string(),
            ConfigKey::MapTileSize => config.map.tile_size.to_string(),
            ConfigKey::RenderWidth => config.render.width.to_string(),
            ConfigKey::RenderHeight => config.render.height.to_string(),
            ConfigKey::RenderBackground => config.render.background.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let key = *self;
        match key {
            ConfigKey::MapZoom => {
                let zoom: u8 = parse_value(key, value)?;
                if zoom > MAX_ZOOM {
                    return Err(self.invalid(value, format!("must be at most {}", MAX_ZOOM)));
                }
                config.map.zoom = zoom;
            }
            ConfigKey::MapTileSize => {
                config.map.tile_size = self.positive(value)?;
            }
            ConfigKey::RenderWidth => {
                config.render.width = self.positive(value)?;
            }
            ConfigKey::RenderHeight => {
                config.render.height = self.positive(value)?;
            }
            ConfigKey::RenderBackground => {
                config.render.background = parse_value::<Color>(key, value)?;
            }
            ConfigKey::LoggingLevel => {
                let level = value.trim();
                EnvFilter::try_new(level).map_err(|e| self.invalid(value, e.to_string()))?;
                config.logging.level = level.to_string();
            }
            ConfigKey::LoggingFile => {
                let path = value.trim();
                config.logging.file = if path.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(path))
                };
            }
        }
        Ok(())
    }

    fn positive(&self, value: &str) -> Result<u32, ConfigError> {
        let n: u32 = parse_value(*self, value)?;
        if n == 0 {
            return Err(self.invalid(value, "must be greater than zero".to_string()));
        }
        Ok(n)
    }

    fn invalid(&self, value: &str, reason: String) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
            reason,
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
