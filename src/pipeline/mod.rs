//! Pipeline module for orchestrating terrain generation.
//!
//! A [`GenerationSession`] walks the fixed [`Phase`] sequence one bounded
//! step at a time, reporting [`Checkpoint`]s to its host.

mod config;
mod phase;
mod progress;
mod session;

pub use config::{ConfigError, TerrainConfig};
pub use phase::Phase;
pub use progress::{format_duration, format_eta, Checkpoint, EtaEstimator, ProgressTracker, ETA_HISTORY};
pub use session::{generate, GeneratedTerrain, GenerationSession, SessionError, Step};
