//! Thermal (talus) erosion.
//!
//! Each iteration compares every cell with its four neighbors. Where a
//! neighbor is lower by more than `talus`, a fraction of the excess moves
//! downhill. The kernel is expressed as shifted whole-grid arrays: one pass
//! builds the neighbor heights, a second the per-direction moves, and a third
//! scatters the moves back as inflow. Material never leaves the grid, so the
//! total height is conserved up to float rounding.
//!
//! With `limit_outflow` set (the default), a cell's total outflow is capped at
//! half of its largest excess before scattering. Unset, every steep neighbor
//! receives exactly `strength * (drop - talus)`.

use super::shift::{shift, Direction, Edge};
use super::ErosionConfig;
use crate::terrain::HeightmapGrid;

/// Reusable thermal erosion kernel for a fixed grid resolution.
#[derive(Debug, Clone)]
pub struct ThermalEroder {
    resolution: usize,
    talus: f32,
    strength: f32,
    limit_outflow: bool,
    neighbor: Vec<f32>,
    moves: [Vec<f32>; 4],
    scratch: Vec<f32>,
}

impl ThermalEroder {
    pub fn new(resolution: usize, config: &ErosionConfig) -> Self {
        let cells = resolution * resolution;
        Self {
            resolution,
            talus: config.talus.max(0.0),
            strength: config.thermal_strength.clamp(0.0, 1.0),
            limit_outflow: config.limit_outflow,
            neighbor: vec![0.0; cells],
            moves: std::array::from_fn(|_| vec![0.0; cells]),
            scratch: vec![0.0; cells],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Run a single relaxation iteration in place.
    pub fn step(&mut self, heights: &mut HeightmapGrid) {
        let n = self.resolution;
        debug_assert_eq!(heights.resolution(), n);
        let h = heights.as_mut_slice();

        // Per-direction excess over talus, scaled by the flow fraction.
        for dir in Direction::ALL {
            shift(h, n, dir, Edge::Clamp, &mut self.neighbor);
            let moves = &mut self.moves[dir.index()];
            for ((m, &hc), &hn) in moves.iter_mut().zip(h.iter()).zip(self.neighbor.iter()) {
                let excess = hc - hn - self.talus;
                *m = if excess > 0.0 { self.strength * excess } else { 0.0 };
            }
        }

        if self.limit_outflow {
            self.cap_outflow();
        }

        // Scatter: a cell receives what its neighbor sent toward it.
        for dir in Direction::ALL {
            shift(
                &self.moves[dir.opposite().index()],
                n,
                dir,
                Edge::Zero,
                &mut self.scratch,
            );
            let outgoing = &self.moves[dir.index()];
            for ((hc, &inflow), &out) in h.iter_mut().zip(self.scratch.iter()).zip(outgoing.iter()) {
                *hc += inflow - out;
            }
        }
    }

    /// Scale each cell's moves so it gives away at most half its largest drop.
    fn cap_outflow(&mut self) {
        for idx in 0..self.resolution * self.resolution {
            let [u, d, l, r] = [
                self.moves[0][idx],
                self.moves[1][idx],
                self.moves[2][idx],
                self.moves[3][idx],
            ];
            let outflow = u + d + l + r;
            if outflow <= 0.0 {
                continue;
            }
            let largest = u.max(d).max(l).max(r);
            let limit = if self.strength > 0.0 {
                0.5 * largest / self.strength
            } else {
                0.0
            };
            if outflow > limit {
                let scale = limit / outflow;
                for m in self.moves.iter_mut() {
                    m[idx] *= scale;
                }
            }
        }
    }
}

/// Run `config.thermal_iterations` relaxation passes over `heights`.
pub fn thermal_erosion(heights: &mut HeightmapGrid, config: &ErosionConfig) {
    if config.thermal_iterations == 0 || heights.resolution() < 2 {
        return;
    }
    let mut eroder = ThermalEroder::new(heights.resolution(), config);
    for _ in 0..config.thermal_iterations {
        eroder.step(heights);
    }
}

/// Largest absolute height difference between interior 4-neighbors.
#[cfg(test)]
pub(crate) fn max_neighbor_difference(heights: &HeightmapGrid) -> f32 {
    let n = heights.resolution();
    let mut worst = 0.0f32;
    for j in 0..n {
        for i in 0..n {
            let h = heights.get(i, j);
            if i + 1 < n {
                worst = worst.max((h - heights.get(i + 1, j)).abs());
            }
            if j + 1 < n {
                worst = worst.max((h - heights.get(i, j + 1)).abs());
            }
        }
    }
    worst
}
