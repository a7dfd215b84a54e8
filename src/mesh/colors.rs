//! Height-banded vertex colors.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Upper limit of a color band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandLimit {
    /// Meters above the configured ocean depth.
    AboveOceanDepth(f32),
    /// Absolute elevation in meters.
    Elevation(f32),
}

impl BandLimit {
    pub fn resolve(self, ocean_depth: f32) -> f32 {
        match self {
            BandLimit::AboveOceanDepth(offset) => ocean_depth + offset,
            BandLimit::Elevation(h) => h,
        }
    }
}

/// A band applies to heights below `upper` and above the previous band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBand {
    pub name: String,
    pub upper: BandLimit,
    pub color: [f32; 3],
}

impl ColorBand {
    fn new(name: &str, upper: BandLimit, color: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            upper,
            color,
        }
    }
}

/// Vertex coloring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Bands in ascending order of `upper`.
    pub bands: Vec<ColorBand>,
    /// Color above the last band.
    pub summit: [f32; 3],
    /// Fraction of the narrower neighboring band over which a boundary blends.
    pub blend_fraction: f32,
    /// Cycles per world of the north-south climate term.
    pub climate_frequency: f32,
    pub climate_amplitude: f32,
    /// Cycles per world of the east-west tint term.
    pub position_frequency: f32,
    pub position_amplitude: f32,
    /// Per-vertex brightness jitter amplitude.
    pub jitter: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        use BandLimit::{AboveOceanDepth, Elevation};
        Self {
            bands: vec![
                ColorBand::new("deep ocean", AboveOceanDepth(10.0), [0.05, 0.15, 0.4]),
                ColorBand::new("shallow ocean", AboveOceanDepth(50.0), [0.1, 0.25, 0.6]),
                ColorBand::new("coastal water", Elevation(0.0), [0.2, 0.4, 0.8]),
                ColorBand::new("beach", Elevation(5.0), [0.9, 0.85, 0.7]),
                ColorBand::new("coastal grass", Elevation(20.0), [0.4, 0.7, 0.2]),
                ColorBand::new("lowland forest", Elevation(100.0), [0.2, 0.5, 0.15]),
                ColorBand::new("highland forest", Elevation(200.0), [0.3, 0.4, 0.2]),
                ColorBand::new("rocky slopes", Elevation(350.0), [0.5, 0.45, 0.35]),
                ColorBand::new("mid mountains", Elevation(600.0), [0.45, 0.4, 0.3]),
                ColorBand::new("high mountains", Elevation(1200.0), [0.55, 0.5, 0.4]),
                ColorBand::new("alpine", Elevation(1800.0), [0.7, 0.65, 0.55]),
            ],
            summit: [0.9, 0.9, 0.95],
            blend_fraction: 0.25,
            climate_frequency: 0.188,
            climate_amplitude: 0.1,
            position_frequency: 0.282,
            position_amplitude: 0.05,
            jitter: 0.02,
        }
    }
}

impl ColorConfig {
    /// Flat band colors: no blending, climate or jitter.
    pub fn flat() -> Self {
        Self {
            blend_fraction: 0.0,
            climate_amplitude: 0.0,
            position_amplitude: 0.0,
            jitter: 0.0,
            ..Self::default()
        }
    }
}

/// Boundary between two adjacent colors.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    height: f32,
    half_width: f32,
}

/// Resolved palette for one world.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    colors: Vec<Vec3>,
    boundaries: Vec<Boundary>,
    config: ColorConfig,
    world_size: f32,
    seed: u64,
}

impl ColorRamp {
    pub fn new(config: &ColorConfig, ocean_depth: f32, world_size: f32, seed: u64) -> Self {
        let mut colors: Vec<Vec3> = config.bands.iter().map(|b| Vec3::from(b.color)).collect();
        colors.push(Vec3::from(config.summit));

        let heights: Vec<f32> = config
            .bands
            .iter()
            .map(|b| b.upper.resolve(ocean_depth))
            .collect();
        let blend = config.blend_fraction.clamp(0.0, 0.5);
        let boundaries = heights
            .iter()
            .enumerate()
            .map(|(k, &height)| {
                let below = k.checked_sub(1).map(|p| height - heights[p]);
                let above = heights.get(k + 1).map(|&next| next - height);
                let width = match (below, above) {
                    (Some(b), Some(a)) => b.min(a),
                    (Some(b), None) => b,
                    (None, Some(a)) => a,
                    (None, None) => 0.0,
                };
                Boundary {
                    height,
                    half_width: (width * blend).max(0.0),
                }
            })
            .collect();

        Self {
            colors,
            boundaries,
            config: config.clone(),
            world_size,
            seed,
        }
    }

    /// Band color at height `h`, blended across nearby boundaries.
    pub fn base_color(&self, h: f32) -> Vec3 {
        let band = self
            .boundaries
            .iter()
            .position(|b| h < b.height)
            .unwrap_or(self.boundaries.len());

        // Only the nearest boundary on either side can be within its blend zone.
        for k in [band.checked_sub(1), Some(band)].into_iter().flatten() {
            let Some(b) = self.boundaries.get(k) else {
                continue;
            };
            if b.half_width > 0.0 && (h - b.height).abs() < b.half_width {
                let t = smoothstep(b.height - b.half_width, b.height + b.half_width, h);
                return self.colors[k].lerp(self.colors[k + 1], t);
            }
        }
        self.colors[band]
    }

    /// Final RGBA color of the vertex at grid cell `(i, j)`.
    pub fn vertex_color(&self, h: f32, warped: Vec2, i: usize, j: usize) -> [f32; 4] {
        let base = self.base_color(h);
        let size = self.world_size.max(f32::EPSILON);
        let c = &self.config;
        let climate = (TAU * c.climate_frequency * warped.y / size).sin() * c.climate_amplitude;
        let tint = (TAU * c.position_frequency * warped.x / size).cos() * c.position_amplitude;
        let jitter = cell_noise(self.seed, i, j) * c.jitter;

        let rgb = Vec3::new(
            base.x + climate + tint + jitter,
            base.y + climate + jitter,
            base.z - climate + tint + jitter,
        )
        .clamp(Vec3::ZERO, Vec3::ONE);
        [rgb.x, rgb.y, rgb.z, 1.0]
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Deterministic value in [-1, 1] for a cell.
fn cell_noise(seed: u64, i: usize, j: usize) -> f32 {
    let mut x = seed
        ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (j as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x = x.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    x ^= x >> 33;
    (x >> 40) as f32 / (1u64 << 23) as f32 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const OCEAN: f32 = -200.0;

    fn flat_ramp() -> ColorRamp {
        ColorRamp::new(&ColorConfig::flat(), OCEAN, 8000.0, 7)
    }

    #[test]
    fn test_default_has_twelve_colors() {
        let config = ColorConfig::default();
        assert_eq!(config.bands.len() + 1, 12);
    }

    #[test]
    fn test_flat_band_lookup() {
        let ramp = flat_ramp();
        assert_eq!(ramp.base_color(-195.0), Vec3::new(0.05, 0.15, 0.4));
        assert_eq!(ramp.base_color(-100.0), Vec3::new(0.2, 0.4, 0.8));
        assert_eq!(ramp.base_color(2.0), Vec3::new(0.9, 0.85, 0.7));
        assert_eq!(ramp.base_color(1500.0), Vec3::new(0.7, 0.65, 0.55));
        assert_eq!(ramp.base_color(1999.0), Vec3::new(0.9, 0.9, 0.95));
    }

    #[test]
    fn test_blend_is_continuous_across_boundary() {
        let ramp = ColorRamp::new(&ColorConfig::default(), OCEAN, 8000.0, 7);
        let below = ramp.base_color(599.999);
        let above = ramp.base_color(600.001);
        assert!((below - above).length() < 1e-3);

        // Outside the blend zone the pure band color is used.
        assert_eq!(ramp.base_color(450.0), Vec3::new(0.45, 0.4, 0.3));
    }

    #[test]
    fn test_vertex_color_in_range() {
        let ramp = ColorRamp::new(&ColorConfig::default(), OCEAN, 8000.0, 3);
        for (k, h) in [-400.0, -150.0, -3.0, 0.0, 12.0, 800.0, 2000.0].into_iter().enumerate() {
            let c = ramp.vertex_color(h, Vec2::new(k as f32 * 500.0, -1000.0), k, 2 * k);
            assert!(c[..3].iter().all(|v| (0.0..=1.0).contains(v)));
            assert_eq!(c[3], 1.0);
        }
    }

    #[test]
    fn test_jitter_deterministic_and_bounded() {
        for (i, j) in [(0, 0), (1, 0), (0, 1), (123, 456)] {
            let v = cell_noise(9, i, j);
            assert_eq!(v, cell_noise(9, i, j));
            assert!((-1.0..=1.0).contains(&v));
        }
        assert_ne!(cell_noise(9, 1, 0), cell_noise(9, 0, 1));
    }
}
