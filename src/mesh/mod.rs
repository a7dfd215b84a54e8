//! Mesh assembly from the finished heightmap.

mod assembler;
mod colors;
mod normals;

pub use assembler::{assemble, MeshBuilder, TerrainMesh, TerrainVertex};
pub use colors::{BandLimit, ColorBand, ColorConfig, ColorRamp};
pub use normals::{compute_normals, gradient_at, normal_from_gradient, normal_row};
