//! Optional hydraulic erosion.
//!
//! Rain accumulates on every cell, water flows toward lower neighbors in
//! proportion to the drop in water surface, and the carried sediment follows
//! the water. Each cell then erodes or deposits toward the carrying capacity of
//! its water column before a fraction of the water evaporates. Terrain plus
//! suspended sediment is conserved.

use super::shift::{shift, Direction, Edge};
use super::ErosionConfig;
use crate::terrain::HeightmapGrid;

const FLOW_EPSILON: f32 = 1e-6;

/// Hydraulic erosion state: water depth and suspended sediment per cell.
#[derive(Debug, Clone)]
pub struct HydraulicEroder {
    resolution: usize,
    config: ErosionConfig,
    water: Vec<f32>,
    sediment: Vec<f32>,
    surface: Vec<f32>,
    neighbor: Vec<f32>,
    flows: [Vec<f32>; 4],
    scratch: Vec<f32>,
    next_water: Vec<f32>,
    next_sediment: Vec<f32>,
}

impl HydraulicEroder {
    pub fn new(resolution: usize, config: &ErosionConfig) -> Self {
        let cells = resolution * resolution;
        Self {
            resolution,
            config: config.clone(),
            water: vec![0.0; cells],
            sediment: vec![0.0; cells],
            surface: vec![0.0; cells],
            neighbor: vec![0.0; cells],
            flows: std::array::from_fn(|_| vec![0.0; cells]),
            scratch: vec![0.0; cells],
            next_water: vec![0.0; cells],
            next_sediment: vec![0.0; cells],
        }
    }

    pub fn water(&self) -> &[f32] {
        &self.water
    }

    pub fn sediment(&self) -> &[f32] {
        &self.sediment
    }

    /// Run one rain, flow, transport and evaporation step in place.
    pub fn step(&mut self, heights: &mut HeightmapGrid) {
        let n = self.resolution;
        debug_assert_eq!(heights.resolution(), n);
        let h = heights.as_mut_slice();
        let rainfall = self.config.rainfall;
        let flow_rate = self.config.flow_rate.clamp(0.0, 1.0);

        for w in self.water.iter_mut() {
            *w += rainfall;
        }
        for ((s, &hc), &w) in self.surface.iter_mut().zip(h.iter()).zip(self.water.iter()) {
            *s = hc + w;
        }

        // Positive surface drop toward each neighbor.
        for dir in Direction::ALL {
            shift(&self.surface, n, dir, Edge::Clamp, &mut self.neighbor);
            let drops = &mut self.flows[dir.index()];
            for ((d, &s), &sn) in drops.iter_mut().zip(self.surface.iter()).zip(self.neighbor.iter()) {
                *d = (s - sn).max(0.0);
            }
        }

        // Distribute `flow_rate` of each cell's water over its downhill drops.
        let mut stagnant = 0usize;
        for idx in 0..n * n {
            let sum: f32 = self.flows.iter().map(|f| f[idx]).sum();
            if sum <= FLOW_EPSILON {
                stagnant += 1;
                for f in self.flows.iter_mut() {
                    f[idx] = 0.0;
                }
                continue;
            }
            let share = self.water[idx] * flow_rate / sum;
            for f in self.flows.iter_mut() {
                f[idx] *= share;
            }
        }

        // Move water and the sediment it carries.
        self.next_water.copy_from_slice(&self.water);
        self.next_sediment.copy_from_slice(&self.sediment);
        for dir in Direction::ALL {
            let out = &self.flows[dir.index()];
            for idx in 0..n * n {
                let w = self.water[idx];
                if out[idx] > 0.0 && w > 0.0 {
                    let carried = self.sediment[idx] * out[idx] / w;
                    self.next_water[idx] -= out[idx];
                    self.next_sediment[idx] -= carried;
                }
            }

            // Incoming water from the neighbor in `dir` that flowed toward us.
            shift(&self.flows[dir.opposite().index()], n, dir, Edge::Zero, &mut self.scratch);
            shift(&self.water, n, dir, Edge::Zero, &mut self.neighbor);
            shift(&self.sediment, n, dir, Edge::Zero, &mut self.surface);
            for idx in 0..n * n {
                let inflow = self.scratch[idx];
                if inflow > 0.0 && self.neighbor[idx] > 0.0 {
                    self.next_water[idx] += inflow;
                    self.next_sediment[idx] += self.surface[idx] * inflow / self.neighbor[idx];
                }
            }
        }
        std::mem::swap(&mut self.water, &mut self.next_water);
        std::mem::swap(&mut self.sediment, &mut self.next_sediment);

        // Erode below capacity, deposit above it.
        let capacity = self.config.sediment_capacity;
        let max_transfer = self.config.max_sediment_transfer;
        for ((hc, s), w) in h.iter_mut().zip(self.sediment.iter_mut()).zip(self.water.iter_mut()) {
            *w = w.max(0.0);
            *s = s.max(0.0);
            let delta = capacity * *w - *s;
            if delta > 0.0 {
                let erode = delta.min(max_transfer);
                *hc -= erode;
                *s += erode;
            } else {
                let deposit = (-delta).min(max_transfer);
                *hc += deposit;
                *s -= deposit;
            }
            *w *= 1.0 - self.config.evaporation;
        }

        if stagnant == n * n {
            log::debug!("hydraulic step: no downhill flow on any cell");
        }
    }
}

/// Run hydraulic erosion if enabled in `config`.
pub fn hydraulic_erosion(heights: &mut HeightmapGrid, config: &ErosionConfig) {
    let steps = config.effective_hydraulic_steps();
    if steps == 0 || heights.resolution() < 2 {
        return;
    }
    let mut eroder = HydraulicEroder::new(heights.resolution(), config);
    for _ in 0..steps {
        eroder.step(heights);
    }
}
