//! Coastline and height synthesis parameters.
//!
//! Horizontal frequencies are in cycles per world width and horizontal
//! amplitudes in fractions of a reference length, so presets hold their shape
//! at any world size. Elevations are meters.

use serde::{Deserialize, Serialize};

use crate::noise::NoiseLayer;

/// Continental outline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoastlineConfig {
    /// Base continental radius as a fraction of world size.
    pub radius_fraction: f32,
    /// Large-wavelength perturbation of the radius. Its amplitude is a
    /// fraction of the base radius.
    pub perturbation: NoiseLayer,
    /// Coarse sampling divisor for the perturbation field.
    pub coarse_divisor: usize,
}

impl Default for CoastlineConfig {
    fn default() -> Self {
        Self {
            radius_fraction: 0.35,
            perturbation: NoiseLayer::new(6, 2.95, 0.387, 0),
            coarse_divisor: 8,
        }
    }
}

/// Rare-peak injection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakConfig {
    /// Very-low-frequency probability field.
    pub field: NoiseLayer,
    /// Field value above which a peak may form.
    pub threshold: f32,
    /// Minimum base height (m) for a peak to form.
    pub min_base_height: f32,
    /// Meters added per unit of field excess over `threshold`.
    pub gain: f32,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            field: NoiseLayer::new(2, 0.295, 1.0, 957),
            threshold: 0.95,
            min_base_height: 800.0,
            gain: 8000.0,
        }
    }
}

/// Elevation synthesis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    /// Highest permitted land elevation (m).
    pub max_elevation: f32,
    /// Mean ocean floor (m).
    pub ocean_depth: f32,
    /// Ocean cells never rise above this (m). Negative.
    pub ocean_ceiling: f32,
    /// Ocean floor variation added to `ocean_depth`.
    pub depth_variation: NoiseLayer,
    /// Land layers from continental to micro scale.
    pub layers: Vec<NoiseLayer>,
    /// Radius past which land is attenuated, as a fraction of world size.
    pub falloff_radius_fraction: f32,
    /// Fraction of the falloff radius where attenuation begins.
    pub falloff_start: f32,
    /// Shape exponent of the attenuation curve.
    pub falloff_exponent: f32,
    pub peaks: PeakConfig,
    /// Coarse sampling divisor for all land and ocean layers.
    pub coarse_divisor: usize,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            max_elevation: 2000.0,
            ocean_depth: -200.0,
            ocean_ceiling: -5.0,
            depth_variation: NoiseLayer::new(3, 0.59, 80.0, 5000),
            layers: vec![
                // continental
                NoiseLayer::new(4, 0.472, 240.0, 0),
                // regional
                NoiseLayer::new(6, 1.77, 100.0, 81),
                // local
                NoiseLayer::new(8, 8.85, 30.0, 414),
                // fine
                NoiseLayer::new(6, 47.2, 7.0, 747),
                // micro
                NoiseLayer::new(4, 236.0, 2.0, 101_070),
                // ultra
                NoiseLayer::new(3, 1180.0, 0.5, 131_373),
            ],
            falloff_radius_fraction: 0.4,
            falloff_start: 0.5,
            falloff_exponent: 1.5,
            peaks: PeakConfig::default(),
            coarse_divisor: 4,
        }
    }
}

/// Ridged mountain pass parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeConfig {
    pub octaves: u8,
    /// Cycles per world width.
    pub frequency: f32,
    /// Ridge height (m) at full intensity.
    pub amplitude: f32,
    /// Cells at or below this height (m) receive no ridges.
    pub min_height: f32,
    /// Height (m) at which ridge intensity saturates.
    pub full_intensity_height: f32,
    pub seed_offset: u64,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self {
            octaves: 3,
            frequency: 3.54,
            amplitude: 200.0,
            min_height: 50.0,
            full_intensity_height: 800.0,
            seed_offset: 1957,
        }
    }
}
