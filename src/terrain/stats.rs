//! Summary statistics of a generated terrain.

use serde::{Deserialize, Serialize};

use super::grid::{HeightmapGrid, LandMask, WorldExtent};

/// Summary of a finished terrain, logged at the end of generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainStats {
    pub min_height: f32,
    pub max_height: f32,
    pub land_cells: usize,
    /// Land area in km².
    pub land_area_km2: f64,
    /// Fraction of cells that are land, in `[0, 1]`.
    pub land_fraction: f64,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

impl TerrainStats {
    pub fn compute(
        extent: &WorldExtent,
        heights: &HeightmapGrid,
        mask: &LandMask,
        vertex_count: usize,
        triangle_count: usize,
    ) -> Self {
        let (min_height, max_height) = heights.range();
        let land_cells = mask.count();
        Self {
            min_height,
            max_height,
            land_cells,
            land_area_km2: land_cells as f64 * extent.cell_area_km2(),
            land_fraction: land_cells as f64 / extent.cell_count() as f64,
            vertex_count,
            triangle_count,
        }
    }

    /// Writes the summary to the log at info level.
    pub fn log(&self, extent: &WorldExtent) {
        log::info!("=== terrain statistics ===");
        log::info!(
            "resolution: {}x{} = {} vertices",
            extent.resolution,
            extent.resolution,
            self.vertex_count
        );
        log::info!("height range: {:.1}m to {:.1}m", self.min_height, self.max_height);
        log::info!(
            "land area: {:.1} km² ({:.1}% of {:.1} km²)",
            self.land_area_km2,
            self.land_fraction * 100.0,
            extent.area_km2()
        );
        log::info!("triangle count: {}", self.triangle_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Grid;

    #[test]
    fn test_compute() {
        let extent = WorldExtent::new(1000.0, 4).unwrap();
        let heights = Grid::from_fn(4, |i, j| (i + j) as f32 - 2.0);
        let mask = Grid::from_fn(4, |i, _| i >= 2);
        let stats = TerrainStats::compute(&extent, &heights, &mask, 16, 18);

        assert_eq!(stats.min_height, -2.0);
        assert_eq!(stats.max_height, 4.0);
        assert_eq!(stats.land_cells, 8);
        assert!((stats.land_fraction - 0.5).abs() < 1e-12);
        assert!((stats.land_area_km2 - 8.0 * 0.0625).abs() < 1e-9);
        assert_eq!(stats.triangle_count, 18);
    }
}
