//! Elevation synthesis from layered noise.

use crate::noise::{bilinear_resize, coarse_resolution, FbmSampler, NoiseField, RidgedSampler};

use super::config::{HeightConfig, RidgeConfig};
use super::grid::{Grid, HeightmapGrid, LandMask, WarpedCoordinateField, WorldExtent};

/// Coarse-grid layer sums awaiting upsampling.
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseLayers {
    /// Sum of all land layers.
    pub base: Grid<f32>,
    /// Rare-peak probability field.
    pub peak: Grid<f32>,
    /// Ocean floor variation.
    pub depth: Grid<f32>,
}

/// Composes multi-scale noise into a clamped elevation grid.
///
/// Land cells sum the configured layers, are attenuated toward the coast and
/// clamped to `[0, max_elevation]`; a handful of cells receive a rare-peak
/// bonus. Ocean cells sit at `ocean_depth` plus variation, capped at
/// `ocean_ceiling`. The ridge pass is applied separately, after composition.
#[derive(Debug, Clone)]
pub struct HeightSynthesizer {
    extent: WorldExtent,
    config: HeightConfig,
    ridge_config: RidgeConfig,
    layers: Vec<FbmSampler>,
    depth: FbmSampler,
    peaks: FbmSampler,
    ridges: RidgedSampler,
    coarse_resolution: usize,
}

impl HeightSynthesizer {
    pub fn new(
        extent: WorldExtent,
        config: &HeightConfig,
        ridge_config: &RidgeConfig,
        noise: &NoiseField,
        seed: u64,
    ) -> Self {
        let size = extent.size;
        Self {
            extent,
            layers: config
                .layers
                .iter()
                .map(|layer| noise.fbm_sampler(layer, seed, size))
                .collect(),
            depth: noise.fbm_sampler(&config.depth_variation, seed, size),
            peaks: noise.fbm_sampler(&config.peaks.field, seed, size),
            ridges: noise.ridged_sampler(
                ridge_config.octaves,
                ridge_config.frequency,
                seed.wrapping_add(ridge_config.seed_offset),
                size,
            ),
            coarse_resolution: coarse_resolution(extent.resolution, config.coarse_divisor),
            config: config.clone(),
            ridge_config: ridge_config.clone(),
        }
    }

    pub fn config(&self) -> &HeightConfig {
        &self.config
    }

    pub fn coarse_resolution(&self) -> usize {
        self.coarse_resolution
    }

    pub fn coarse_coordinates(&self, warped: &WarpedCoordinateField) -> WarpedCoordinateField {
        bilinear_resize(warped, self.coarse_resolution)
    }

    pub fn coarse_layers(&self) -> CoarseLayers {
        let n = self.coarse_resolution;
        CoarseLayers {
            base: Grid::new(n, 0.0),
            peak: Grid::new(n, 0.0),
            depth: Grid::new(n, 0.0),
        }
    }

    /// Evaluates every layer on coarse row `j`.
    pub fn fill_row(&self, coarse: &WarpedCoordinateField, layers: &mut CoarseLayers, j: usize) {
        for (i, p) in coarse.row(j).iter().enumerate() {
            let base: f32 = self.layers.iter().map(|layer| layer.sample_at(*p)).sum();
            layers.base.set(i, j, base);
            layers.peak.set(i, j, self.peaks.sample_at(*p));
            layers.depth.set(i, j, self.depth.sample_at(*p));
        }
    }

    /// Coastal attenuation multiplier at warped distance `dist` from center.
    pub fn falloff(&self, dist: f32) -> f32 {
        let radius = self.config.falloff_radius_fraction * self.extent.size;
        let start = radius * self.config.falloff_start;
        let width = radius - start;
        if dist <= start {
            return 1.0;
        }
        if width <= 0.0 {
            return 0.0;
        }
        let t = (dist - start) / width;
        (1.0 - t.powf(self.config.falloff_exponent)).clamp(0.0, 1.0)
    }

    /// Final land height from the summed layers, distance and peak field.
    pub fn land_height(&self, base: f32, dist: f32, peak: f32) -> f32 {
        let max = self.config.max_elevation;
        let mut h = (base * self.falloff(dist)).clamp(0.0, max);
        let peaks = &self.config.peaks;
        if peak > peaks.threshold && h > peaks.min_base_height {
            h = (h + (peak - peaks.threshold) * peaks.gain).min(max);
        }
        h
    }

    /// Ocean height from the depth variation sample.
    pub fn ocean_height(&self, variation: f32) -> f32 {
        (self.config.ocean_depth + variation).min(self.config.ocean_ceiling)
    }

    /// Upsamples the coarse layers and composes the full heightmap.
    pub fn compose(&self, warped: &WarpedCoordinateField, mask: &LandMask, layers: &CoarseLayers) -> HeightmapGrid {
        let n = self.extent.resolution;
        let base = bilinear_resize(&layers.base, n);
        let peak = bilinear_resize(&layers.peak, n);
        let depth = bilinear_resize(&layers.depth, n);

        let mut heights = Grid::from_fn(n, |i, j| {
            if mask.get(i, j) {
                self.land_height(base.get(i, j), warped.get(i, j).length(), peak.get(i, j))
            } else {
                self.ocean_height(depth.get(i, j))
            }
        });
        self.enforce_bounds(&mut heights, mask);
        heights
    }

    /// Composes the full heightmap in one call (no ridges).
    pub fn synthesize(&self, warped: &WarpedCoordinateField, mask: &LandMask) -> HeightmapGrid {
        let coarse = self.coarse_coordinates(warped);
        let mut layers = self.coarse_layers();
        for j in 0..self.coarse_resolution {
            self.fill_row(&coarse, &mut layers, j);
        }
        self.compose(warped, mask, &layers)
    }

    /// Adds ridged mountains to elevated land cells of row `j`.
    ///
    /// Intensity grows with current height so lowlands stay smooth.
    pub fn ridge_row(&self, heights: &mut HeightmapGrid, mask: &LandMask, warped: &WarpedCoordinateField, j: usize) {
        let cfg = &self.ridge_config;
        let max = self.config.max_elevation;
        let land = mask.row(j);
        let coords = warped.row(j);
        for ((h, &is_land), p) in heights.row_mut(j).iter_mut().zip(land).zip(coords) {
            if !is_land || *h <= cfg.min_height {
                continue;
            }
            let intensity = if cfg.full_intensity_height > 0.0 {
                (*h / cfg.full_intensity_height).min(1.0)
            } else {
                1.0
            };
            let ridge = self.ridges.sample_at(*p) * cfg.amplitude * intensity;
            *h = (*h + ridge).clamp(0.0, max);
        }
    }

    /// Applies the ridge pass to every row.
    pub fn apply_ridges(&self, heights: &mut HeightmapGrid, mask: &LandMask, warped: &WarpedCoordinateField) {
        for j in 0..heights.resolution() {
            self.ridge_row(heights, mask, warped, j);
        }
    }

    /// Re-establishes the elevation invariants: land in `[0, max_elevation]`,
    /// ocean at or below `ocean_ceiling`, everything finite.
    ///
    /// Returns the number of cells that had to be adjusted.
    pub fn enforce_bounds(&self, heights: &mut HeightmapGrid, mask: &LandMask) -> usize {
        let max = self.config.max_elevation;
        let ceiling = self.config.ocean_ceiling;
        let mut adjusted = 0;
        for (h, &is_land) in heights.as_mut_slice().iter_mut().zip(mask.iter()) {
            let bounded = match (is_land, h.is_finite()) {
                (true, true) => h.clamp(0.0, max),
                (false, true) => h.min(ceiling),
                (true, false) => 0.0,
                (false, false) => ceiling,
            };
            if bounded != *h {
                adjusted += 1;
                *h = bounded;
            }
        }
        if adjusted > 0 {
            log::debug!("enforce_bounds: adjusted {} cells", adjusted);
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WarpConfig;
    use crate::terrain::{CoastlineClassifier, CoastlineConfig, WarpFieldBuilder};

    fn setup(resolution: usize, seed: u64) -> (WorldExtent, WarpedCoordinateField, LandMask, HeightSynthesizer) {
        let extent = WorldExtent::new(8000.0, resolution).unwrap();
        let noise = NoiseField::default();
        let warped = WarpFieldBuilder::new(extent, &WarpConfig::default(), &noise, seed).build();
        let mask = CoastlineClassifier::new(extent, &CoastlineConfig::default(), &noise, seed).classify(&warped);
        let synth = HeightSynthesizer::new(extent, &HeightConfig::default(), &RidgeConfig::default(), &noise, seed);
        (extent, warped, mask, synth)
    }

    #[test]
    fn test_heights_respect_bounds() {
        let (_, warped, mask, synth) = setup(64, 42);
        let heights = synth.synthesize(&warped, &mask);
        assert_eq!(heights.resolution(), mask.resolution());

        for (h, &land) in heights.iter().zip(mask.iter()) {
            assert!(h.is_finite());
            if land {
                assert!((0.0..=2000.0).contains(h), "land height {h}");
            } else {
                assert!(*h <= -5.0, "ocean height {h}");
            }
        }
    }

    #[test]
    fn test_has_relief() {
        let mut saw_land_above_sea = false;
        for seed in 1..=5 {
            let (_, warped, mask, synth) = setup(64, seed);
            let heights = synth.synthesize(&warped, &mask);
            let (min, max) = heights.range();
            assert!(min < 0.0, "corners are ocean");
            saw_land_above_sea |= max > 0.0;
        }
        assert!(saw_land_above_sea);
    }

    #[test]
    fn test_all_ocean_world() {
        let (_, warped, _, synth) = setup(24, 3);
        let mask = Grid::new(24, false);
        let heights = synth.synthesize(&warped, &mask);
        assert!(heights.iter().all(|&h| h <= -5.0));
    }

    #[test]
    fn test_falloff_profile() {
        let (extent, _, _, synth) = setup(8, 1);
        let radius = 0.4 * extent.size;
        assert_eq!(synth.falloff(0.0), 1.0);
        assert_eq!(synth.falloff(radius * 0.5), 1.0);
        let mid = synth.falloff(radius * 0.75);
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(synth.falloff(radius), 0.0);
        assert_eq!(synth.falloff(radius * 2.0), 0.0);
    }

    #[test]
    fn test_rare_peak_injection() {
        let (_, _, _, synth) = setup(8, 1);
        // Excess over threshold adds (p - 0.95) * 8000 m.
        assert!((synth.land_height(900.0, 0.0, 1.0) - 1300.0).abs() < 0.01);
        // Below the probability threshold: no bonus.
        assert_eq!(synth.land_height(900.0, 0.0, 0.5), 900.0);
        // Base too low: no bonus.
        assert_eq!(synth.land_height(500.0, 0.0, 1.0), 500.0);
        // Bonus re-clamped.
        assert_eq!(synth.land_height(1900.0, 0.0, 1.2), 2000.0);
        assert_eq!(synth.land_height(-40.0, 0.0, 1.2), 0.0);
    }

    #[test]
    fn test_ocean_height_capped() {
        let (_, _, _, synth) = setup(8, 1);
        assert_eq!(synth.ocean_height(-30.0), -230.0);
        assert_eq!(synth.ocean_height(500.0), -5.0);
    }

    #[test]
    fn test_ridges_only_raise_elevated_land() {
        let (_, warped, mask, synth) = setup(48, 11);
        let before = Grid::from_fn(48, |i, _| i as f32 * 40.0);
        let mut after = before.clone();
        synth.apply_ridges(&mut after, &mask, &warped);

        for (i, j) in before.coords() {
            let (b, a) = (before.get(i, j), after.get(i, j));
            if !mask.get(i, j) || b <= 50.0 {
                assert_eq!(a, b);
            } else {
                assert!(a >= b && a <= 2000.0);
            }
        }
    }

    #[test]
    fn test_enforce_bounds_repairs_cells() {
        let (_, _, _, synth) = setup(2, 1);
        let mask = Grid::from_vec(2, vec![true, true, false, false]).unwrap();
        let mut heights = Grid::from_vec(2, vec![-3.0, f32::NAN, 12.0, -50.0]).unwrap();
        assert_eq!(synth.enforce_bounds(&mut heights, &mask), 3);
        assert_eq!(heights.as_slice(), &[0.0, 0.0, -5.0, -50.0]);
    }
}
