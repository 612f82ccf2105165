//! Configuration for the tilt-clock terminal clock.
//!
//! Settings live in a TOML file in the platform config directory. Every
//! field has a default, so a missing file or a partial file both load.

mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tilt_clock_core::{ColorTheme, TimeFormat, ViewportFramer};

pub use error::ConfigError;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "TILT_CLOCK_CONFIG";

const CONFIG_FILE: &str = "config.toml";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub time_format: TimeFormat,
    pub color_theme: ColorTheme,
    /// Show the date and time overlays.
    pub show_readout: bool,
    /// Ring the terminal bell once per second.
    pub tick_sound: bool,
    /// Target frames per second.
    pub frame_rate: u32,
    pub tilt: TiltConfig,
    pub framing: FramingConfig,
    pub assets: AssetsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::default(),
            color_theme: ColorTheme::default(),
            show_readout: true,
            tick_sound: true,
            frame_rate: 60,
            tilt: TiltConfig::default(),
            framing: FramingConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

/// Orientation input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Raw readings are clamped to +/- this many degrees.
    pub max_tilt_deg: f32,
    /// Multiplier applied to clamped readings.
    pub damping: f32,
    /// Ask before reading orientation input.
    pub require_permission: bool,
    /// Degrees added per arrow key press.
    pub key_step_deg: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_tilt_deg: 15.0,
            damping: 0.5,
            require_permission: true,
            key_step_deg: 5.0,
        }
    }
}

/// Camera and backdrop framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub fov_deg: f32,
    pub face_size: f32,
    pub safety_margin: f32,
    pub tile_size: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        let framer = ViewportFramer::default();
        Self {
            fov_deg: framer.fov_deg,
            face_size: framer.face_size,
            safety_margin: framer.safety_margin,
            tile_size: framer.tile_size,
        }
    }
}

impl FramingConfig {
    pub fn framer(&self) -> ViewportFramer {
        ViewportFramer {
            fov_deg: self.fov_deg,
            face_size: self.face_size,
            safety_margin: self.safety_margin,
            tile_size: self.tile_size,
            ..ViewportFramer::default()
        }
    }
}

/// Optional asset files. Unset entries use the built-in versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Image tiled across the backdrop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_texture: Option<PathBuf>,
    /// Equirectangular image reflected by metal parts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_map: Option<PathBuf>,
    /// TOML stroke font for the numerals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeral_font: Option<PathBuf>,
}

impl Config {
    /// Default config file location, honoring [`CONFIG_ENV`].
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "tilt-clock").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location, or defaults if there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("no config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(write_err)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Reject settings the clock cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=240).contains(&self.frame_rate) {
            return Err(ConfigError::Invalid {
                field: "frame_rate",
                reason: "must be between 1 and 240",
            });
        }
        if !(self.tilt.max_tilt_deg > 0.0 && self.tilt.max_tilt_deg <= 90.0) {
            return Err(ConfigError::Invalid {
                field: "tilt.max_tilt_deg",
                reason: "must be in (0, 90]",
            });
        }
        if !(self.tilt.damping > 0.0 && self.tilt.damping <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "tilt.damping",
                reason: "must be in (0, 1]",
            });
        }
        if !(self.tilt.key_step_deg > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tilt.key_step_deg",
                reason: "must be positive",
            });
        }
        if !(self.framing.fov_deg > 0.0 && self.framing.fov_deg < 180.0) {
            return Err(ConfigError::Invalid {
                field: "framing.fov_deg",
                reason: "must be in (0, 180)",
            });
        }
        if !(self.framing.face_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "framing.face_size",
                reason: "must be positive",
            });
        }
        if !(self.framing.safety_margin > 1.0) {
            return Err(ConfigError::Invalid {
                field: "framing.safety_margin",
                reason: "must be greater than 1",
            });
        }
        if !(self.framing.tile_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "framing.tile_size",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}
