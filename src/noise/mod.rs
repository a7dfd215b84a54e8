//! Deterministic scalar noise fields for terrain synthesis.
//!
//! Gradient (Perlin) noise over seed-keyed permutation tables, fractal sums,
//! ridged noise and domain warping. Permutation tables are memoized in an
//! explicit [`PermutationRegistry`] rather than a hidden global.

mod fractal;
mod perlin;
mod registry;
mod resample;

pub use fractal::{FbmSampler, NoiseField, NoiseLayer, RidgedSampler, WarpConfig, WarpSampler};
pub use perlin::{fade, perlin_with_table, PermutationTable, PERMUTATION_SIZE};
pub use registry::PermutationRegistry;
pub use resample::{bilinear_resize, coarse_resolution};
