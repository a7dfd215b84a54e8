//! Terrain synthesis stages.
//!
//! Grid storage, the domain-warped coordinate field, coastline
//! classification and height synthesis.

mod coastline;
mod config;
mod grid;
mod heightmap;
mod stats;
mod warp;

pub use coastline::CoastlineClassifier;
pub use config::{CoastlineConfig, HeightConfig, PeakConfig, RidgeConfig};
pub use grid::{Grid, HeightmapGrid, LandMask, WarpedCoordinateField, WorldExtent};
pub use heightmap::{CoarseLayers, HeightSynthesizer};
pub use stats::TerrainStats;
pub use warp::WarpFieldBuilder;
