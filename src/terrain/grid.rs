//! World extent and square grid storage shared by every synthesis stage.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::pipeline::ConfigError;

/// Physical size and sampling density of the generated world.
///
/// The world is a square `size` meters wide, centered on the origin, sampled
/// by `resolution` points per axis (corners included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldExtent {
    /// Width of the world in meters.
    pub size: f32,
    /// Samples per axis (>= 2).
    pub resolution: usize,
}

impl Default for WorldExtent {
    fn default() -> Self {
        Self {
            size: 8000.0,
            resolution: 256,
        }
    }
}

impl WorldExtent {
    /// Creates a validated extent.
    pub fn new(size: f32, resolution: usize) -> Result<Self, ConfigError> {
        let extent = Self { size, resolution };
        extent.validate()?;
        Ok(extent)
    }

    /// Checks `resolution >= 2` and a finite, positive `size`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution < 2 {
            return Err(ConfigError::InvalidResolution(self.resolution));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ConfigError::InvalidSize(self.size));
        }
        Ok(())
    }

    /// Distance in meters between adjacent samples.
    pub fn spacing(&self) -> f32 {
        self.size / (self.resolution - 1) as f32
    }

    /// World coordinate of sample index `i` along either axis.
    pub fn coordinate(&self, i: usize) -> f32 {
        self.coordinate_on(i, self.resolution)
    }

    /// World coordinate of sample `i` on an axis of `samples` points spanning
    /// the same extent (used for coarse sub-grids).
    pub fn coordinate_on(&self, i: usize, samples: usize) -> f32 {
        let half = self.size * 0.5;
        if samples < 2 {
            return -half;
        }
        -half + self.size * (i as f32 / (samples - 1) as f32)
    }

    /// Unwarped world position of grid cell `(i, j)`.
    pub fn position(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(self.coordinate(i), self.coordinate(j))
    }

    /// Total number of samples.
    pub fn cell_count(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Ground area represented by one cell, in km².
    pub fn cell_area_km2(&self) -> f64 {
        let side = self.size as f64 / self.resolution as f64;
        side * side / 1_000_000.0
    }

    /// Total world area in km².
    pub fn area_km2(&self) -> f64 {
        let size = self.size as f64;
        size * size / 1_000_000.0
    }
}

/// Square row-major grid. `(i, j)` is column `i` (east) and row `j` (north).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    resolution: usize,
    data: Vec<T>,
}

/// Elevation in meters per cell.
pub type HeightmapGrid = Grid<f32>;
/// `true` where a cell is land.
pub type LandMask = Grid<bool>;
/// Warped world-space sample position per cell.
pub type WarpedCoordinateField = Grid<Vec2>;

impl<T: Copy> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn new(resolution: usize, value: T) -> Self {
        Self {
            resolution,
            data: vec![value; resolution * resolution],
        }
    }

    /// Creates a grid by evaluating `f(i, j)` in row order.
    pub fn from_fn(resolution: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(resolution * resolution);
        for j in 0..resolution {
            for i in 0..resolution {
                data.push(f(i, j));
            }
        }
        Self { resolution, data }
    }

    /// Wraps existing row-major data. Returns `None` on a length mismatch.
    pub fn from_vec(resolution: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == resolution * resolution).then_some(Self { resolution, data })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.resolution && j < self.resolution);
        j * self.resolution + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[self.index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    /// Value at `(i, j)` with out-of-range coordinates clamped to the border.
    #[inline]
    pub fn get_clamped(&self, i: isize, j: isize) -> T {
        let max = self.resolution as isize - 1;
        self.get(i.clamp(0, max) as usize, j.clamp(0, max) as usize)
    }

    pub fn row(&self, j: usize) -> &[T] {
        let start = j * self.resolution;
        &self.data[start..start + self.resolution]
    }

    pub fn row_mut(&mut self, j: usize) -> &mut [T] {
        let start = j * self.resolution;
        &mut self.data[start..start + self.resolution]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterator over all `(i, j)` coordinates in row order.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let res = self.resolution;
        (0..res).flat_map(move |j| (0..res).map(move |i| (i, j)))
    }
}

impl Grid<f32> {
    /// `(min, max)` over all cells.
    pub fn range(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// FNV-1a hash over the bit patterns of every cell, in row order.
    pub fn checksum(&self) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for value in &self.data {
            for byte in value.to_bits().to_le_bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
        }
        hash
    }
}

impl Grid<bool> {
    /// Number of `true` cells.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_validation() {
        assert!(WorldExtent::new(8000.0, 2).is_ok());
        assert!(matches!(
            WorldExtent::new(8000.0, 1),
            Err(ConfigError::InvalidResolution(1))
        ));
        assert!(matches!(WorldExtent::new(0.0, 10), Err(ConfigError::InvalidSize(_))));
        assert!(matches!(WorldExtent::new(-5.0, 10), Err(ConfigError::InvalidSize(_))));
        assert!(WorldExtent::new(f32::NAN, 10).is_err());
    }

    #[test]
    fn test_extent_coordinates() {
        let extent = WorldExtent::new(100.0, 5).unwrap();
        assert_eq!(extent.spacing(), 25.0);
        assert_eq!(extent.coordinate(0), -50.0);
        assert_eq!(extent.coordinate(2), 0.0);
        assert_eq!(extent.coordinate(4), 50.0);
        assert_eq!(extent.coordinate_on(1, 3), 0.0);
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(16, 0.0f32);
        assert_eq!(grid.len(), 256);
        assert!(grid.iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_get_set() {
        let mut grid = Grid::new(8, 0.0f32);
        grid.set(3, 5, 1.5);
        assert_eq!(grid.get(3, 5), 1.5);
        assert_eq!(grid.row(5)[3], 1.5);
        assert_eq!(grid.as_slice()[5 * 8 + 3], 1.5);
    }

    #[test]
    fn test_clamped_access() {
        let grid = Grid::from_fn(3, |i, j| (j * 3 + i) as f32);
        assert_eq!(grid.get_clamped(-1, 0), grid.get(0, 0));
        assert_eq!(grid.get_clamped(3, 2), grid.get(2, 2));
        assert_eq!(grid.get_clamped(1, -4), grid.get(1, 0));
    }

    #[test]
    fn test_coords_iterator() {
        let grid = Grid::new(4, 0u8);
        let coords: Vec<_> = grid.coords().collect();
        assert_eq!(coords.len(), 16);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (1, 0));
        assert_eq!(coords[4], (0, 1));
        assert_eq!(coords[15], (3, 3));
    }

    #[test]
    fn test_range_and_count() {
        let mut grid = Grid::new(4, 0.0f32);
        grid.set(0, 0, -0.5);
        grid.set(3, 3, 1.5);
        assert_eq!(grid.range(), (-0.5, 1.5));

        let mask = Grid::from_fn(4, |i, _| i < 2);
        assert_eq!(mask.count(), 8);
    }

    #[test]
    fn test_checksum_sensitive_to_values() {
        let a = Grid::from_fn(4, |i, j| (i + j) as f32);
        let mut b = a.clone();
        assert_eq!(a.checksum(), b.checksum());
        b.set(2, 2, 4.0001);
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn test_from_vec_length_check() {
        assert!(Grid::from_vec(2, vec![1, 2, 3, 4]).is_some());
        assert!(Grid::from_vec(2, vec![1, 2, 3]).is_none());
    }
}
