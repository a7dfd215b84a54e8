//! Coarse-grid evaluation support: bilinear upsampling.
//!
//! Expensive multi-octave layers are sampled on a reduced grid and stretched
//! back to full resolution. Corner samples of the coarse and fine grids
//! coincide, so both grids span the same world rectangle.

use std::ops::{Add, Mul};

use crate::terrain::Grid;

/// Coarse sub-grid resolution for a full `resolution` grid reduced by `divisor`.
///
/// Never below 2 (bilinear needs two samples per axis) and never above
/// `resolution`.
pub fn coarse_resolution(resolution: usize, divisor: usize) -> usize {
    (resolution / divisor.max(1)).max(2).min(resolution)
}

/// Resamples `src` to `new_resolution` with bilinear interpolation.
pub fn bilinear_resize<T>(src: &Grid<T>, new_resolution: usize) -> Grid<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let n = src.resolution();
    if n == new_resolution {
        return src.clone();
    }

    let taps: Vec<(usize, usize, f32)> = (0..new_resolution)
        .map(|k| sample_position(k, new_resolution, n))
        .collect();

    Grid::from_fn(new_resolution, |i, j| {
        let (x0, x1, wx) = taps[i];
        let (y0, y1, wy) = taps[j];
        let a = src.get(x0, y0);
        let b = src.get(x1, y0);
        let c = src.get(x0, y1);
        let d = src.get(x1, y1);
        a * ((1.0 - wy) * (1.0 - wx)) + b * ((1.0 - wy) * wx) + c * (wy * (1.0 - wx)) + d * (wy * wx)
    })
}

/// Maps target index `k` of `m` samples onto the source axis of `n` samples.
fn sample_position(k: usize, m: usize, n: usize) -> (usize, usize, f32) {
    if m <= 1 || n <= 1 {
        return (0, 0, 0.0);
    }
    let pos = k as f32 * (n - 1) as f32 / (m - 1) as f32;
    let i0 = (pos.floor() as usize).min(n - 1);
    let i1 = (i0 + 1).min(n - 1);
    (i0, i1, pos - i0 as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_coarse_resolution_bounds() {
        assert_eq!(coarse_resolution(1000, 8), 125);
        assert_eq!(coarse_resolution(50, 8), 6);
        assert_eq!(coarse_resolution(2, 8), 2);
        assert_eq!(coarse_resolution(3, 8), 2);
    }

    #[test]
    fn test_identity_resize() {
        let grid = Grid::from_fn(4, |i, j| (i * 10 + j) as f32);
        assert_eq!(bilinear_resize(&grid, 4), grid);
    }

    #[test]
    fn test_corners_preserved() {
        let grid = Grid::from_fn(3, |i, j| (i * 3 + j) as f32 * 1.5);
        let up = bilinear_resize(&grid, 9);
        assert_eq!(up.get(0, 0), grid.get(0, 0));
        assert_eq!(up.get(8, 0), grid.get(2, 0));
        assert_eq!(up.get(0, 8), grid.get(0, 2));
        assert_eq!(up.get(8, 8), grid.get(2, 2));
    }

    #[test]
    fn test_linear_field_reproduced() {
        // Bilinear interpolation is exact on an affine field.
        let grid = Grid::from_fn(5, |i, j| 2.0 * i as f32 - 3.0 * j as f32);
        let up = bilinear_resize(&grid, 17);
        for j in 0..17 {
            for i in 0..17 {
                let x = i as f32 * 4.0 / 16.0;
                let y = j as f32 * 4.0 / 16.0;
                assert!((up.get(i, j) - (2.0 * x - 3.0 * y)).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_vector_resize() {
        let grid = Grid::from_fn(2, |i, j| Vec2::new(i as f32, j as f32));
        let up = bilinear_resize(&grid, 3);
        assert_eq!(up.get(1, 1), Vec2::new(0.5, 0.5));
    }
}
