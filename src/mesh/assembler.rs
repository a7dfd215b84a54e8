//! Mesh assembly: vertex, normal, color and index buffers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::colors::{ColorConfig, ColorRamp};
use super::normals::normal_row;
use crate::terrain::{HeightmapGrid, WarpedCoordinateField, WorldExtent};

/// Interleaved vertex record for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// Renderable terrain: X east, Y north, Z elevation in meters.
///
/// All triangles live in one index buffer and face +Z (counter-clockwise
/// seen from above).
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub resolution: usize,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((p, n), c)| TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
                color: *c,
            })
            .collect()
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Incremental mesh builder, one grid row per call.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    extent: WorldExtent,
    ramp: ColorRamp,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<[f32; 4]>,
    indices: Vec<u32>,
    row_normals: Vec<Vec3>,
}

impl MeshBuilder {
    /// Allocates every buffer up front.
    pub fn new(extent: WorldExtent, colors: &ColorConfig, ocean_depth: f32, seed: u64) -> Self {
        let n = extent.resolution;
        let vertices = n * n;
        let quads = n.saturating_sub(1).pow(2);
        Self {
            extent,
            ramp: ColorRamp::new(colors, ocean_depth, extent.size, seed),
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(quads * 6),
            row_normals: vec![Vec3::Z; n],
        }
    }

    pub fn resolution(&self) -> usize {
        self.extent.resolution
    }

    /// Appends positions and colors for row `j`.
    pub fn push_vertex_row(&mut self, heights: &HeightmapGrid, warped: &WarpedCoordinateField, j: usize) {
        let y = self.extent.coordinate(j);
        for (i, (&h, &w)) in heights.row(j).iter().zip(warped.row(j)).enumerate() {
            self.positions.push(Vec3::new(self.extent.coordinate(i), y, h));
            self.colors.push(self.ramp.vertex_color(h, w, i, j));
        }
    }

    /// Appends normals for row `j`.
    pub fn push_normal_row(&mut self, heights: &HeightmapGrid, j: usize) {
        normal_row(heights, self.extent.spacing(), j, &mut self.row_normals);
        self.normals.extend_from_slice(&self.row_normals);
    }

    /// Appends the two triangles of every quad between rows `j` and `j + 1`.
    pub fn push_triangle_row(&mut self, j: usize) {
        let n = self.extent.resolution;
        if j + 1 >= n {
            return;
        }
        for i in 0..n - 1 {
            let v0 = (j * n + i) as u32;
            let v1 = v0 + 1;
            let v2 = v0 + n as u32;
            let v3 = v2 + 1;
            self.indices.extend_from_slice(&[v0, v1, v2, v1, v3, v2]);
        }
    }

    pub fn finish(self) -> TerrainMesh {
        TerrainMesh {
            resolution: self.extent.resolution,
            positions: self.positions,
            normals: self.normals,
            colors: self.colors,
            indices: self.indices,
        }
    }
}

/// Builds the complete mesh in one call.
pub fn assemble(
    extent: WorldExtent,
    heights: &HeightmapGrid,
    warped: &WarpedCoordinateField,
    colors: &ColorConfig,
    ocean_depth: f32,
    seed: u64,
) -> TerrainMesh {
    let n = extent.resolution;
    let mut builder = MeshBuilder::new(extent, colors, ocean_depth, seed);
    for j in 0..n {
        builder.push_vertex_row(heights, warped, j);
    }
    for j in 0..n {
        builder.push_normal_row(heights, j);
    }
    for j in 0..n.saturating_sub(1) {
        builder.push_triangle_row(j);
    }
    builder.finish()
}
