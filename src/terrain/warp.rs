//! Domain-warped coordinate field.

use glam::Vec2;

use crate::noise::{bilinear_resize, coarse_resolution, NoiseField, WarpConfig, WarpSampler};

use super::grid::{Grid, WarpedCoordinateField, WorldExtent};

/// Builds the [`WarpedCoordinateField`] shared by every noise-sampling stage.
///
/// The warp is evaluated on a coarse sub-grid one row at a time and then
/// upsampled to full resolution.
#[derive(Debug, Clone)]
pub struct WarpFieldBuilder {
    extent: WorldExtent,
    sampler: WarpSampler,
    coarse_resolution: usize,
}

impl WarpFieldBuilder {
    pub fn new(extent: WorldExtent, config: &WarpConfig, noise: &NoiseField, seed: u64) -> Self {
        Self {
            extent,
            sampler: noise.warp_sampler(config, seed, extent.size),
            coarse_resolution: coarse_resolution(extent.resolution, config.coarse_divisor),
        }
    }

    pub fn coarse_resolution(&self) -> usize {
        self.coarse_resolution
    }

    /// Empty coarse grid to be filled by [`fill_row`](Self::fill_row).
    pub fn coarse_grid(&self) -> WarpedCoordinateField {
        Grid::new(self.coarse_resolution, Vec2::ZERO)
    }

    /// Evaluates coarse row `j`.
    pub fn fill_row(&self, coarse: &mut WarpedCoordinateField, j: usize) {
        let n = self.coarse_resolution;
        let y = self.extent.coordinate_on(j, n);
        for (i, cell) in coarse.row_mut(j).iter_mut().enumerate() {
            let x = self.extent.coordinate_on(i, n);
            *cell = self.sampler.warp(x, y);
        }
    }

    /// Upsamples a filled coarse grid to full resolution.
    pub fn finish(&self, coarse: &WarpedCoordinateField) -> WarpedCoordinateField {
        bilinear_resize(coarse, self.extent.resolution)
    }

    /// Builds the full field in one call.
    pub fn build(&self) -> WarpedCoordinateField {
        let mut coarse = self.coarse_grid();
        for j in 0..self.coarse_resolution {
            self.fill_row(&mut coarse, j);
        }
        self.finish(&coarse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_matches_extent() {
        let extent = WorldExtent::new(8000.0, 40).unwrap();
        let builder = WarpFieldBuilder::new(extent, &WarpConfig::default(), &NoiseField::default(), 42);
        assert_eq!(builder.coarse_resolution(), 5);
        let field = builder.build();
        assert_eq!(field.resolution(), 40);
        assert!(field.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_zero_strength_is_base_grid() {
        let extent = WorldExtent::new(1000.0, 9).unwrap();
        let config = WarpConfig {
            strength: 0.0,
            coarse_divisor: 1,
            ..Default::default()
        };
        let field = WarpFieldBuilder::new(extent, &config, &NoiseField::default(), 1).build();
        for (i, j) in field.coords() {
            assert_eq!(field.get(i, j), extent.position(i, j));
        }
    }

    #[test]
    fn test_warp_stays_near_base_grid() {
        let extent = WorldExtent::new(8000.0, 33).unwrap();
        let config = WarpConfig::default();
        let field = WarpFieldBuilder::new(extent, &config, &NoiseField::default(), 7).build();
        let limit = config.strength * extent.size * 1.75 + extent.spacing() * 2.0;
        for (i, j) in field.coords() {
            assert!(field.get(i, j).distance(extent.position(i, j)) <= limit);
        }
    }
}
