//! Surface normals from central differences.

use glam::Vec3;

use crate::terrain::{Grid, HeightmapGrid};

/// Normal of a surface with height gradient `(dx, dy)`.
///
/// Falls back to straight up when the gradient is not finite.
pub fn normal_from_gradient(dx: f32, dy: f32) -> Vec3 {
    let n = Vec3::new(-dx, -dy, 1.0);
    let len = n.length();
    if !len.is_finite() || len <= f32::EPSILON {
        log::debug!("degenerate gradient ({dx}, {dy}), using up normal");
        return Vec3::Z;
    }
    n / len
}

/// Height gradient at `(i, j)`, with border samples clamped to the grid.
///
/// The divisor is always `2 * spacing`, so border gradients are one-sided
/// differences at half weight.
pub fn gradient_at(heights: &HeightmapGrid, i: usize, j: usize, spacing: f32) -> (f32, f32) {
    let (i, j) = (i as isize, j as isize);
    let inv = 1.0 / (2.0 * spacing);
    let dx = (heights.get_clamped(i + 1, j) - heights.get_clamped(i - 1, j)) * inv;
    let dy = (heights.get_clamped(i, j + 1) - heights.get_clamped(i, j - 1)) * inv;
    (dx, dy)
}

/// Writes the normals of row `j` into `out`.
pub fn normal_row(heights: &HeightmapGrid, spacing: f32, j: usize, out: &mut [Vec3]) {
    for (i, n) in out.iter_mut().enumerate() {
        let (dx, dy) = gradient_at(heights, i, j, spacing);
        *n = normal_from_gradient(dx, dy);
    }
}

/// Normals for the whole grid.
pub fn compute_normals(heights: &HeightmapGrid, spacing: f32) -> Grid<Vec3> {
    let n = heights.resolution();
    let mut normals = Grid::new(n, Vec3::Z);
    for j in 0..n {
        normal_row(heights, spacing, j, normals.row_mut(j));
    }
    normals
}
