//! Fractal Brownian motion, ridged noise and domain warping.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::perlin::{perlin_with_table, PermutationTable};
use super::registry::PermutationRegistry;

/// Seed spacing between ridged octaves.
const RIDGED_OCTAVE_SEED_STRIDE: u64 = 10;
/// Seed offset of the y component of a domain warp.
const WARP_Y_SEED_OFFSET: u64 = 100;
/// Octaves used by each domain warp component.
const WARP_OCTAVES: u8 = 3;
/// Warp sampling frequency (per unit) used by [`NoiseField::domain_warp`].
pub const DEFAULT_WARP_FREQUENCY: f32 = 2.0e-5;

/// One independently seeded fBm layer.
///
/// `frequency` is in cycles per world width so a layer keeps its character
/// at any world size; `amplitude` is in output units (meters for height layers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayer {
    /// Number of octaves summed.
    pub octaves: u8,
    /// Base frequency in cycles per world width.
    pub frequency: f32,
    /// Amplitude of the first octave.
    pub amplitude: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Amplitude multiplier per octave.
    pub persistence: f32,
    /// Added to the session seed to decorrelate this layer from the others.
    pub seed_offset: u64,
}

impl Default for NoiseLayer {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 1.0,
            amplitude: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
            seed_offset: 0,
        }
    }
}

impl NoiseLayer {
    /// Creates a layer with the default lacunarity and persistence.
    pub fn new(octaves: u8, frequency: f32, amplitude: f32, seed_offset: u64) -> Self {
        Self {
            octaves,
            frequency,
            amplitude,
            seed_offset,
            ..Default::default()
        }
    }

    /// Upper bound of `|fbm|` for this layer.
    pub fn max_magnitude(&self) -> f32 {
        let mut total = 0.0;
        let mut amplitude = self.amplitude.abs();
        for _ in 0..self.octaves {
            total += amplitude;
            amplitude *= self.persistence.abs();
        }
        total
    }
}

/// Domain warp parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Displacement scale as a fraction of world width.
    pub strength: f32,
    /// Warp field frequency in cycles per world width.
    pub frequency: f32,
    pub seed_offset: u64,
    /// Coarse sampling divisor; the warp is upsampled bilinearly.
    pub coarse_divisor: usize,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            strength: 0.0136,
            frequency: 1.18,
            seed_offset: 0,
            coarse_divisor: 8,
        }
    }
}

/// Entry point for noise sampling.
///
/// Every call is a pure function of its arguments; the only shared state is
/// the permutation registry, which is itself a pure function of seed.
#[derive(Debug, Clone)]
pub struct NoiseField {
    registry: Arc<PermutationRegistry>,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(PermutationRegistry::shared())
    }
}

impl NoiseField {
    pub fn new(registry: Arc<PermutationRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<PermutationRegistry> {
        &self.registry
    }

    /// Gradient noise in `[-1, 1]`.
    pub fn perlin(&self, x: f32, y: f32, seed: u64) -> f32 {
        perlin_with_table(&self.registry.table(seed), x, y)
    }

    /// Sums `octaves` Perlin samples at increasing frequency and decreasing
    /// amplitude. Octave `i` uses seed `seed + i`.
    #[allow(clippy::too_many_arguments)]
    pub fn fbm(
        &self,
        x: f32,
        y: f32,
        octaves: u8,
        frequency: f32,
        amplitude: f32,
        lacunarity: f32,
        persistence: f32,
        seed: u64,
    ) -> f32 {
        let mut value = 0.0;
        let mut amp = amplitude;
        let mut freq = frequency;
        for i in 0..octaves {
            value += amp * self.perlin(x * freq, y * freq, seed.wrapping_add(i as u64));
            amp *= persistence;
            freq *= lacunarity;
        }
        value
    }

    /// Ridged multi-octave noise: each octave contributes `(1 - |n|)^2`.
    ///
    /// Returns a value in `[0, 2)`.
    pub fn ridged(&self, x: f32, y: f32, octaves: u8, frequency: f32, seed: u64) -> f32 {
        let mut value = 0.0;
        let mut amp = 1.0;
        let mut freq = frequency;
        for i in 0..octaves {
            let octave_seed = seed.wrapping_add(i as u64 * RIDGED_OCTAVE_SEED_STRIDE);
            let n = 1.0 - self.perlin(x * freq, y * freq, octave_seed).abs();
            value += n * n * amp;
            amp *= 0.5;
            freq *= 2.0;
        }
        value
    }

    /// Displaces `(x, y)` by two independent low-frequency fBm fields scaled by
    /// `strength`.
    pub fn domain_warp(&self, x: f32, y: f32, strength: f32, seed: u64) -> Vec2 {
        let f = DEFAULT_WARP_FREQUENCY;
        let dx = self.fbm(x, y, WARP_OCTAVES, f, 1.0, 2.0, 0.5, seed);
        let dy = self.fbm(x, y, WARP_OCTAVES, f, 1.0, 2.0, 0.5, seed.wrapping_add(WARP_Y_SEED_OFFSET));
        Vec2::new(x + dx * strength, y + dy * strength)
    }

    /// Resolves an fBm layer against `seed` for sampling in world units
    /// (meters) on a world `world_size` wide.
    pub fn fbm_sampler(&self, layer: &NoiseLayer, seed: u64, world_size: f32) -> FbmSampler {
        let base = seed.wrapping_add(layer.seed_offset);
        FbmSampler {
            tables: self.octave_tables(base, layer.octaves, 1),
            frequency: layer.frequency / world_size,
            amplitude: layer.amplitude,
            lacunarity: layer.lacunarity,
            persistence: layer.persistence,
        }
    }

    /// Resolves a ridged field with `frequency` in cycles per world width.
    pub fn ridged_sampler(&self, octaves: u8, frequency: f32, seed: u64, world_size: f32) -> RidgedSampler {
        RidgedSampler {
            tables: self.octave_tables(seed, octaves, RIDGED_OCTAVE_SEED_STRIDE),
            frequency: frequency / world_size,
        }
    }

    /// Resolves a domain warp for a world `world_size` wide.
    pub fn warp_sampler(&self, config: &WarpConfig, seed: u64, world_size: f32) -> WarpSampler {
        let layer = NoiseLayer::new(WARP_OCTAVES, config.frequency, 1.0, config.seed_offset);
        let y_layer = NoiseLayer {
            seed_offset: config.seed_offset.wrapping_add(WARP_Y_SEED_OFFSET),
            ..layer.clone()
        };
        WarpSampler {
            dx: self.fbm_sampler(&layer, seed, world_size),
            dy: self.fbm_sampler(&y_layer, seed, world_size),
            strength: config.strength * world_size,
        }
    }

    fn octave_tables(&self, seed: u64, octaves: u8, stride: u64) -> Vec<Arc<PermutationTable>> {
        (0..octaves as u64)
            .map(|i| self.registry.table(seed.wrapping_add(i * stride)))
            .collect()
    }
}

/// An fBm layer with its per-octave tables resolved; sampling takes no locks.
#[derive(Debug, Clone)]
pub struct FbmSampler {
    tables: Vec<Arc<PermutationTable>>,
    frequency: f32,
    amplitude: f32,
    lacunarity: f32,
    persistence: f32,
}

impl FbmSampler {
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut value = 0.0;
        let mut amp = self.amplitude;
        let mut freq = self.frequency;
        for table in &self.tables {
            value += amp * perlin_with_table(table, x * freq, y * freq);
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        value
    }

    pub fn sample_at(&self, p: Vec2) -> f32 {
        self.sample(p.x, p.y)
    }
}

/// A ridged field with its per-octave tables resolved.
#[derive(Debug, Clone)]
pub struct RidgedSampler {
    tables: Vec<Arc<PermutationTable>>,
    frequency: f32,
}

impl RidgedSampler {
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut value = 0.0;
        let mut amp = 1.0;
        let mut freq = self.frequency;
        for table in &self.tables {
            let n = 1.0 - perlin_with_table(table, x * freq, y * freq).abs();
            value += n * n * amp;
            amp *= 0.5;
            freq *= 2.0;
        }
        value
    }

    pub fn sample_at(&self, p: Vec2) -> f32 {
        self.sample(p.x, p.y)
    }
}

/// A resolved domain warp.
#[derive(Debug, Clone)]
pub struct WarpSampler {
    dx: FbmSampler,
    dy: FbmSampler,
    strength: f32,
}

impl WarpSampler {
    pub fn warp(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            x + self.dx.sample(x, y) * self.strength,
            y + self.dy.sample(x, y) * self.strength,
        )
    }
}
