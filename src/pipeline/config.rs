//! Root generation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::erosion::ErosionConfig;
use crate::mesh::ColorConfig;
use crate::noise::WarpConfig;
use crate::terrain::{CoastlineConfig, HeightConfig, RidgeConfig, WorldExtent};

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid resolution: {0} (must be >= 2)")]
    InvalidResolution(usize),
    #[error("Invalid world size: {0} (must be finite and > 0)")]
    InvalidSize(f32),
    #[error("Invalid erosion parameter: {0}")]
    InvalidErosion(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to generate one terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub extent: WorldExtent,
    pub seed: u64,
    pub warp: WarpConfig,
    pub coastline: CoastlineConfig,
    pub heights: HeightConfig,
    pub ridges: RidgeConfig,
    pub erosion: ErosionConfig,
    pub colors: ColorConfig,
    /// Grid rows processed between two checkpoints.
    pub checkpoint_rows: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            extent: WorldExtent::default(),
            seed: 42,
            warp: WarpConfig::default(),
            coastline: CoastlineConfig::default(),
            heights: HeightConfig::default(),
            ridges: RidgeConfig::default(),
            erosion: ErosionConfig::default(),
            colors: ColorConfig::default(),
            checkpoint_rows: 8,
        }
    }
}

impl TerrainConfig {
    /// Default configuration for the given world.
    pub fn new(size: f32, resolution: usize, seed: u64) -> Self {
        Self {
            extent: WorldExtent { size, resolution },
            seed,
            ..Self::default()
        }
    }

    /// A small, fast world suited to previews.
    pub fn preview(seed: u64) -> Self {
        Self {
            extent: WorldExtent {
                size: 8000.0,
                resolution: 64,
            },
            seed,
            erosion: ErosionConfig {
                thermal_iterations: 10,
                ..ErosionConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extent.validate()?;
        self.erosion.validate()?;

        let h = &self.heights;
        if !h.max_elevation.is_finite() || h.max_elevation <= 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "max_elevation must be > 0, got {}",
                h.max_elevation
            )));
        }
        if !h.ocean_ceiling.is_finite() || h.ocean_ceiling >= 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "ocean_ceiling must be below sea level, got {}",
                h.ocean_ceiling
            )));
        }
        if !h.ocean_depth.is_finite() {
            return Err(ConfigError::InvalidParameter("ocean_depth must be finite".into()));
        }
        let radius = self.coastline.radius_fraction;
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "coastline radius_fraction must be >= 0, got {radius}"
            )));
        }
        if self.checkpoint_rows == 0 {
            return Err(ConfigError::InvalidParameter("checkpoint_rows must be >= 1".into()));
        }
        Ok(())
    }

    /// Parses a (possibly partial) TOML document without validating it.
    /// Missing fields keep their defaults.
    pub fn parse_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a TOML file without validating it, so callers can apply
    /// overrides first.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_toml(&text)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_toml(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
