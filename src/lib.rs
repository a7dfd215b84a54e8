//! Procedural island terrain synthesis.
//!
//! This crate generates a square, island-shaped terrain from seeded noise:
//! a domain-warped radial coastline, layered fractal elevation with ridges and
//! rare peaks, thermal (and optional hydraulic) erosion, and finally a single
//! batched, colored triangle mesh. Generation runs as a resumable
//! [`GenerationSession`] that yields progress checkpoints to its host.

pub mod erosion;
pub mod mesh;
pub mod noise;
pub mod pipeline;
pub mod terrain;

pub use erosion::ErosionConfig;
pub use mesh::{ColorConfig, TerrainMesh, TerrainVertex};
pub use noise::{NoiseField, NoiseLayer, PermutationRegistry, WarpConfig};
pub use pipeline::{generate, Checkpoint, GeneratedTerrain, GenerationSession, Phase, SessionError, Step, TerrainConfig};
pub use terrain::{HeightmapGrid, LandMask, TerrainStats, WarpedCoordinateField, WorldExtent};
