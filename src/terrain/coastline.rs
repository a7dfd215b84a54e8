//! Land/ocean classification from a warped radial continent.

use crate::noise::{bilinear_resize, coarse_resolution, FbmSampler, NoiseField};

use super::config::CoastlineConfig;
use super::grid::{Grid, LandMask, WarpedCoordinateField, WorldExtent};

/// Derives the [`LandMask`] from warped distance to the world center.
///
/// A cell is land iff its warped distance is within the continental radius,
/// itself perturbed by a large-wavelength fBm field so the outline is
/// irregular. A non-positive radius yields an all-ocean mask.
#[derive(Debug, Clone)]
pub struct CoastlineClassifier {
    extent: WorldExtent,
    base_radius: f32,
    perturbation: FbmSampler,
    coarse_resolution: usize,
}

impl CoastlineClassifier {
    pub fn new(extent: WorldExtent, config: &CoastlineConfig, noise: &NoiseField, seed: u64) -> Self {
        Self {
            extent,
            base_radius: config.radius_fraction * extent.size,
            perturbation: noise.fbm_sampler(&config.perturbation, seed, extent.size),
            coarse_resolution: coarse_resolution(extent.resolution, config.coarse_divisor),
        }
    }

    /// Unperturbed continental radius in meters.
    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn coarse_resolution(&self) -> usize {
        self.coarse_resolution
    }

    /// Reduces the warped field to the coarse sampling grid.
    pub fn coarse_coordinates(&self, warped: &WarpedCoordinateField) -> WarpedCoordinateField {
        bilinear_resize(warped, self.coarse_resolution)
    }

    /// Empty coarse perturbation grid.
    pub fn perturbation_grid(&self) -> Grid<f32> {
        Grid::new(self.coarse_resolution, 0.0)
    }

    /// Evaluates coarse perturbation row `j`.
    pub fn fill_row(&self, coarse: &WarpedCoordinateField, perturbation: &mut Grid<f32>, j: usize) {
        for (out, p) in perturbation.row_mut(j).iter_mut().zip(coarse.row(j)) {
            *out = self.perturbation.sample_at(*p);
        }
    }

    /// Radius at a cell given its perturbation sample. Never negative.
    #[inline]
    pub fn radius(&self, perturbation: f32) -> f32 {
        (self.base_radius * (1.0 + perturbation)).max(0.0)
    }

    /// Upsamples the perturbation field and classifies every cell.
    pub fn finish(&self, warped: &WarpedCoordinateField, perturbation: &Grid<f32>) -> LandMask {
        let perturbation = bilinear_resize(perturbation, self.extent.resolution);
        Grid::from_fn(self.extent.resolution, |i, j| {
            let radius = self.radius(perturbation.get(i, j));
            radius > 0.0 && warped.get(i, j).length() <= radius
        })
    }

    /// Classifies a whole field in one call.
    pub fn classify(&self, warped: &WarpedCoordinateField) -> LandMask {
        let coarse = self.coarse_coordinates(warped);
        let mut perturbation = self.perturbation_grid();
        for j in 0..self.coarse_resolution {
            self.fill_row(&coarse, &mut perturbation, j);
        }
        self.finish(warped, &perturbation)
    }
}
