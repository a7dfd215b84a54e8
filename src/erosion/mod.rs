//! Erosion simulation.
//!
//! Thermal erosion relaxes slopes steeper than the talus threshold; optional
//! hydraulic erosion carves channels with simulated rainfall. Both operate on
//! whole-grid shifted arrays rather than per-cell neighbor loops.

mod config;
mod hydraulic;
mod shift;
mod thermal;

pub use config::ErosionConfig;
pub use hydraulic::{hydraulic_erosion, HydraulicEroder};
pub use thermal::{thermal_erosion, ThermalEroder};
