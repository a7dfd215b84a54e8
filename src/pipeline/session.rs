//! Resumable generation session.
//!
//! A [`GenerationSession`] runs the whole pipeline as a state machine. Each
//! call to [`resume`](GenerationSession::resume) performs one bounded unit of
//! work (a batch of grid rows or one erosion iteration) and returns a
//! [`Checkpoint`]; once every phase has run, the next call returns the
//! finished terrain. A host cancels by dropping the session.

use thiserror::Error;

use crate::erosion::{HydraulicEroder, ThermalEroder};
use crate::mesh::{MeshBuilder, TerrainMesh};
use crate::noise::NoiseField;
use crate::terrain::{
    CoarseLayers, CoastlineClassifier, Grid, HeightSynthesizer, HeightmapGrid, LandMask, TerrainStats,
    WarpFieldBuilder, WarpedCoordinateField,
};

use super::config::{ConfigError, TerrainConfig};
use super::phase::Phase;
use super::progress::{Checkpoint, ProgressTracker};

/// Errors returned by [`GenerationSession`].
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Session already delivered its terrain")]
    AlreadyFinished,
}

/// Everything a finished session produces.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTerrain {
    pub mesh: TerrainMesh,
    pub heights: HeightmapGrid,
    pub land_mask: LandMask,
    pub warped: WarpedCoordinateField,
    pub stats: TerrainStats,
}

/// Result of one [`GenerationSession::resume`] call.
#[derive(Debug)]
pub enum Step {
    Checkpoint(Checkpoint),
    Finished(Box<GeneratedTerrain>),
}

/// Grids that exist once base terrain is composed.
#[derive(Debug)]
struct Surface {
    warped: WarpedCoordinateField,
    mask: LandMask,
    heights: HeightmapGrid,
}

#[derive(Debug)]
enum State {
    Setup,
    Warp {
        coarse: WarpedCoordinateField,
        row: usize,
    },
    Coastline {
        warped: WarpedCoordinateField,
        coarse: WarpedCoordinateField,
        perturbation: Grid<f32>,
        row: usize,
    },
    BaseTerrain {
        warped: WarpedCoordinateField,
        mask: LandMask,
        coarse: WarpedCoordinateField,
        layers: CoarseLayers,
        row: usize,
    },
    Ridges {
        surface: Surface,
        row: usize,
    },
    Erosion {
        surface: Surface,
        thermal: ThermalEroder,
        hydraulic: Option<HydraulicEroder>,
        iteration: u32,
    },
    MeshSetup {
        surface: Surface,
    },
    Vertices {
        surface: Surface,
        builder: MeshBuilder,
        row: usize,
    },
    Normals {
        surface: Surface,
        builder: MeshBuilder,
        row: usize,
    },
    Triangles {
        surface: Surface,
        builder: MeshBuilder,
        row: usize,
    },
    Assembly {
        surface: Surface,
        builder: MeshBuilder,
    },
    Stats {
        surface: Surface,
        mesh: TerrainMesh,
    },
    Complete(Box<GeneratedTerrain>),
    Done,
}

/// Cooperative terrain generation, one checkpoint per [`resume`](Self::resume).
#[derive(Debug)]
pub struct GenerationSession {
    config: TerrainConfig,
    noise: NoiseField,
    warp: WarpFieldBuilder,
    coastline: CoastlineClassifier,
    synthesizer: HeightSynthesizer,
    state: State,
    progress: f32,
    tracker: ProgressTracker,
}

impl GenerationSession {
    /// Validates `config` and prepares a session with a private noise registry.
    pub fn new(config: TerrainConfig) -> Result<Self, SessionError> {
        Self::with_noise(config, NoiseField::default())
    }

    /// Like [`new`](Self::new), sharing permutation tables through `noise`.
    pub fn with_noise(config: TerrainConfig, noise: NoiseField) -> Result<Self, SessionError> {
        config.validate()?;
        let extent = config.extent;
        let seed = config.seed;
        Ok(Self {
            warp: WarpFieldBuilder::new(extent, &config.warp, &noise, seed),
            coastline: CoastlineClassifier::new(extent, &config.coastline, &noise, seed),
            synthesizer: HeightSynthesizer::new(extent, &config.heights, &config.ridges, &noise, seed),
            noise,
            config,
            state: State::Setup,
            progress: 0.0,
            tracker: ProgressTracker::new(),
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Progress of the last checkpoint, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Phase the next [`resume`](Self::resume) will work on, `None` once the
    /// terrain is ready or delivered.
    pub fn phase(&self) -> Option<Phase> {
        match &self.state {
            State::Setup => Some(Phase::Setup),
            State::Warp { .. } => Some(Phase::Warp),
            State::Coastline { .. } => Some(Phase::Coastline),
            State::BaseTerrain { .. } => Some(Phase::BaseTerrain),
            State::Ridges { .. } => Some(Phase::Ridges),
            State::Erosion { .. } => Some(Phase::Erosion),
            State::MeshSetup { .. } => Some(Phase::MeshSetup),
            State::Vertices { .. } => Some(Phase::Vertices),
            State::Normals { .. } => Some(Phase::Normals),
            State::Triangles { .. } => Some(Phase::Triangles),
            State::Assembly { .. } => Some(Phase::Assembly),
            State::Stats { .. } => Some(Phase::Stats),
            State::Complete(_) | State::Done => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Done)
    }

    /// Estimated time remaining, `None` while unknown.
    pub fn eta(&self) -> Option<std::time::Duration> {
        self.tracker.eta()
    }

    /// Performs the next unit of work.
    ///
    /// Returns [`Step::Checkpoint`] while work remains, then
    /// [`Step::Finished`] exactly once, then [`SessionError::AlreadyFinished`].
    pub fn resume(&mut self) -> Result<Step, SessionError> {
        let state = std::mem::replace(&mut self.state, State::Done);
        let (next, checkpoint) = match state {
            State::Done => return Err(SessionError::AlreadyFinished),
            State::Complete(terrain) => {
                self.tracker.finish();
                return Ok(Step::Finished(terrain));
            }
            other => self.advance(other),
        };
        self.state = next;

        let checkpoint = Checkpoint {
            progress: checkpoint.progress.max(self.progress).min(1.0),
            ..checkpoint
        };
        self.progress = checkpoint.progress;
        self.tracker.observe(&checkpoint);
        Ok(Step::Checkpoint(checkpoint))
    }

    /// Runs to completion, forwarding every checkpoint to `on_checkpoint`.
    pub fn run_with_progress<F>(mut self, mut on_checkpoint: F) -> Result<GeneratedTerrain, SessionError>
    where
        F: FnMut(&Checkpoint),
    {
        loop {
            match self.resume()? {
                Step::Checkpoint(checkpoint) => on_checkpoint(&checkpoint),
                Step::Finished(terrain) => return Ok(*terrain),
            }
        }
    }

    /// Rows per checkpoint, never zero.
    fn batch(&self) -> usize {
        self.config.checkpoint_rows.max(1)
    }

    fn advance(&mut self, state: State) -> (State, Checkpoint) {
        let n = self.config.extent.resolution;
        let batch = self.batch();
        match state {
            State::Setup => {
                log::info!(
                    "generating {}x{} terrain over {:.0}m (seed {})",
                    n,
                    n,
                    self.config.extent.size,
                    self.config.seed
                );
                log::debug!("noise registry holds {} permutation tables", self.noise.registry().len());
                let coarse = self.warp.coarse_grid();
                (
                    State::Warp { coarse, row: 0 },
                    Checkpoint::new(Phase::Setup.progress_at(1.0), "Noise samplers ready", Phase::Setup),
                )
            }

            State::Warp { mut coarse, row } => {
                let rows = self.warp.coarse_resolution();
                let end = (row + batch).min(rows);
                for j in row..end {
                    self.warp.fill_row(&mut coarse, j);
                }
                let checkpoint = Checkpoint::new(
                    Phase::Warp.progress_at(end as f32 / rows as f32),
                    format!("Domain warp: row {end}/{rows}"),
                    Phase::Warp,
                );
                if end < rows {
                    return (State::Warp { coarse, row: end }, checkpoint);
                }
                let warped = self.warp.finish(&coarse);
                let coarse = self.coastline.coarse_coordinates(&warped);
                let perturbation = self.coastline.perturbation_grid();
                (
                    State::Coastline {
                        warped,
                        coarse,
                        perturbation,
                        row: 0,
                    },
                    checkpoint,
                )
            }

            State::Coastline {
                warped,
                coarse,
                mut perturbation,
                row,
            } => {
                let rows = self.coastline.coarse_resolution();
                let end = (row + batch).min(rows);
                for j in row..end {
                    self.coastline.fill_row(&coarse, &mut perturbation, j);
                }
                let checkpoint = Checkpoint::new(
                    Phase::Coastline.progress_at(end as f32 / rows as f32),
                    format!("Coastline: row {end}/{rows}"),
                    Phase::Coastline,
                );
                if end < rows {
                    return (
                        State::Coastline {
                            warped,
                            coarse,
                            perturbation,
                            row: end,
                        },
                        checkpoint,
                    );
                }
                let mask = self.coastline.finish(&warped, &perturbation);
                log::debug!("coastline: {} of {} cells are land", mask.count(), mask.len());
                let coarse = self.synthesizer.coarse_coordinates(&warped);
                let layers = self.synthesizer.coarse_layers();
                (
                    State::BaseTerrain {
                        warped,
                        mask,
                        coarse,
                        layers,
                        row: 0,
                    },
                    checkpoint,
                )
            }

            State::BaseTerrain {
                warped,
                mask,
                coarse,
                mut layers,
                row,
            } => {
                let rows = self.synthesizer.coarse_resolution();
                let end = (row + batch).min(rows);
                for j in row..end {
                    self.synthesizer.fill_row(&coarse, &mut layers, j);
                }
                let checkpoint = Checkpoint::new(
                    Phase::BaseTerrain.progress_at(end as f32 / rows as f32),
                    format!("Base terrain: row {end}/{rows}"),
                    Phase::BaseTerrain,
                );
                if end < rows {
                    return (
                        State::BaseTerrain {
                            warped,
                            mask,
                            coarse,
                            layers,
                            row: end,
                        },
                        checkpoint,
                    );
                }
                let heights = self.synthesizer.compose(&warped, &mask, &layers);
                (
                    State::Ridges {
                        surface: Surface { warped, mask, heights },
                        row: 0,
                    },
                    checkpoint,
                )
            }

            State::Ridges { mut surface, row } => {
                let end = (row + batch).min(n);
                for j in row..end {
                    self.synthesizer
                        .ridge_row(&mut surface.heights, &surface.mask, &surface.warped, j);
                }
                let checkpoint = Checkpoint::new(
                    Phase::Ridges.progress_at(end as f32 / n as f32),
                    format!("Ridges: row {end}/{n}"),
                    Phase::Ridges,
                );
                if end < n {
                    return (State::Ridges { surface, row: end }, checkpoint);
                }
                self.synthesizer.enforce_bounds(&mut surface.heights, &surface.mask);
                let erosion = &self.config.erosion;
                let hydraulic = erosion
                    .hydraulic_enabled
                    .then(|| HydraulicEroder::new(n, erosion));
                (
                    State::Erosion {
                        surface,
                        thermal: ThermalEroder::new(n, erosion),
                        hydraulic,
                        iteration: 0,
                    },
                    checkpoint,
                )
            }

            State::Erosion {
                mut surface,
                mut thermal,
                mut hydraulic,
                iteration,
            } => {
                let thermal_iterations = self.config.erosion.thermal_iterations;
                let total = self.config.erosion.total_iterations();
                let description = if iteration >= total {
                    "Erosion skipped".to_string()
                } else if iteration < thermal_iterations {
                    thermal.step(&mut surface.heights);
                    format!("Thermal erosion: iteration {}/{}", iteration + 1, thermal_iterations)
                } else if let Some(eroder) = hydraulic.as_mut() {
                    eroder.step(&mut surface.heights);
                    format!(
                        "Hydraulic erosion: step {}/{}",
                        iteration + 1 - thermal_iterations,
                        total - thermal_iterations
                    )
                } else {
                    "Erosion skipped".to_string()
                };
                let done = (iteration + 1).min(total);
                let fraction = if total == 0 { 1.0 } else { done as f32 / total as f32 };
                let checkpoint = Checkpoint::new(Phase::Erosion.progress_at(fraction), description, Phase::Erosion);
                if done < total {
                    return (
                        State::Erosion {
                            surface,
                            thermal,
                            hydraulic,
                            iteration: done,
                        },
                        checkpoint,
                    );
                }
                self.synthesizer.enforce_bounds(&mut surface.heights, &surface.mask);
                (State::MeshSetup { surface }, checkpoint)
            }

            State::MeshSetup { surface } => {
                let builder = MeshBuilder::new(
                    self.config.extent,
                    &self.config.colors,
                    self.config.heights.ocean_depth,
                    self.config.seed,
                );
                (
                    State::Vertices {
                        surface,
                        builder,
                        row: 0,
                    },
                    Checkpoint::new(
                        Phase::MeshSetup.progress_at(1.0),
                        format!("Mesh buffers allocated for {} vertices", n * n),
                        Phase::MeshSetup,
                    ),
                )
            }

            State::Vertices {
                surface,
                mut builder,
                row,
            } => {
                let end = (row + batch).min(n);
                for j in row..end {
                    builder.push_vertex_row(&surface.heights, &surface.warped, j);
                }
                let checkpoint = Checkpoint::new(
                    Phase::Vertices.progress_at(end as f32 / n as f32),
                    format!("Vertices: row {end}/{n}"),
                    Phase::Vertices,
                );
                let row = if end < n { end } else { 0 };
                let next = if end < n {
                    State::Vertices { surface, builder, row }
                } else {
                    State::Normals { surface, builder, row }
                };
                (next, checkpoint)
            }

            State::Normals {
                surface,
                mut builder,
                row,
            } => {
                let end = (row + batch).min(n);
                for j in row..end {
                    builder.push_normal_row(&surface.heights, j);
                }
                let checkpoint = Checkpoint::new(
                    Phase::Normals.progress_at(end as f32 / n as f32),
                    format!("Normals: row {end}/{n}"),
                    Phase::Normals,
                );
                let row = if end < n { end } else { 0 };
                let next = if end < n {
                    State::Normals { surface, builder, row }
                } else {
                    State::Triangles { surface, builder, row }
                };
                (next, checkpoint)
            }

            State::Triangles {
                surface,
                mut builder,
                row,
            } => {
                let rows = n - 1;
                let end = (row + batch).min(rows);
                for j in row..end {
                    builder.push_triangle_row(j);
                }
                let checkpoint = Checkpoint::new(
                    Phase::Triangles.progress_at(end as f32 / rows as f32),
                    format!("Triangles: {}/{}", end * rows * 2, rows * rows * 2),
                    Phase::Triangles,
                );
                let next = if end < rows {
                    State::Triangles {
                        surface,
                        builder,
                        row: end,
                    }
                } else {
                    State::Assembly { surface, builder }
                };
                (next, checkpoint)
            }

            State::Assembly { surface, builder } => {
                let mesh = builder.finish();
                let checkpoint = Checkpoint::new(
                    Phase::Assembly.progress_at(1.0),
                    format!(
                        "Mesh assembled: {} vertices, {} triangles",
                        mesh.vertex_count(),
                        mesh.triangle_count()
                    ),
                    Phase::Assembly,
                );
                (State::Stats { surface, mesh }, checkpoint)
            }

            State::Stats { surface, mesh } => {
                let stats = TerrainStats::compute(
                    &self.config.extent,
                    &surface.heights,
                    &surface.mask,
                    mesh.vertex_count(),
                    mesh.triangle_count(),
                );
                stats.log(&self.config.extent);
                let terrain = GeneratedTerrain {
                    mesh,
                    heights: surface.heights,
                    land_mask: surface.mask,
                    warped: surface.warped,
                    stats,
                };
                (
                    State::Complete(Box::new(terrain)),
                    Checkpoint::new(1.0, "Terrain complete", Phase::Stats),
                )
            }

            // Terminal states are handled by `resume`.
            terminal @ (State::Complete(_) | State::Done) => {
                (terminal, Checkpoint::new(1.0, "Terrain complete", Phase::Stats))
            }
        }
    }
}

/// Runs a session to completion and returns the terrain.
pub fn generate(config: TerrainConfig) -> Result<GeneratedTerrain, SessionError> {
    GenerationSession::new(config)?.run_with_progress(|_| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erosion::ErosionConfig;

    fn small_config(resolution: usize, seed: u64) -> TerrainConfig {
        TerrainConfig {
            erosion: ErosionConfig {
                thermal_iterations: 5,
                ..ErosionConfig::default()
            },
            ..TerrainConfig::new(8000.0, resolution, seed)
        }
    }

    fn collect(config: TerrainConfig) -> (Vec<Checkpoint>, GeneratedTerrain) {
        let mut checkpoints = Vec::new();
        let terrain = GenerationSession::new(config)
            .unwrap()
            .run_with_progress(|c| checkpoints.push(c.clone()))
            .unwrap();
        (checkpoints, terrain)
    }

    #[test]
    fn test_rejects_invalid_config_before_work() {
        let err = GenerationSession::new(TerrainConfig::new(8000.0, 1, 0)).unwrap_err();
        assert!(matches!(err, SessionError::Config(ConfigError::InvalidResolution(1))));

        let err = GenerationSession::new(TerrainConfig::new(-5.0, 32, 0)).unwrap_err();
        assert!(matches!(err, SessionError::Config(ConfigError::InvalidSize(_))));
    }

    #[test]
    fn test_progress_is_monotonic_and_complete() {
        let (checkpoints, _) = collect(small_config(24, 3));
        assert!(!checkpoints.is_empty());

        let mut last = 0.0f32;
        let mut last_phase = 1u8;
        for c in &checkpoints {
            assert!((0.0..=1.0).contains(&c.progress));
            assert!(c.progress >= last, "{} after {}", c.progress, last);
            assert!((1..=12).contains(&c.phase_number()));
            assert!(c.phase_number() >= last_phase);
            last = c.progress;
            last_phase = c.phase_number();
        }
        assert_eq!(checkpoints.last().map(|c| c.progress), Some(1.0));

        for phase in Phase::ALL {
            assert!(
                checkpoints.iter().any(|c| c.phase == phase),
                "no checkpoint for {phase}"
            );
        }
    }

    #[test]
    fn test_finishes_exactly_once() {
        let mut session = GenerationSession::new(small_config(8, 1)).unwrap();
        assert_eq!(session.phase(), Some(Phase::Setup));
        loop {
            match session.resume().unwrap() {
                Step::Checkpoint(_) => continue,
                Step::Finished(terrain) => {
                    assert_eq!(terrain.mesh.vertex_count(), 64);
                    break;
                }
            }
        }
        assert!(session.is_finished());
        assert_eq!(session.phase(), None);
        assert!(matches!(session.resume(), Err(SessionError::AlreadyFinished)));
    }

    #[test]
    fn test_checkpoint_granularity() {
        let fine = TerrainConfig {
            checkpoint_rows: 1,
            ..small_config(32, 5)
        };
        let coarse = TerrainConfig {
            checkpoint_rows: 64,
            ..small_config(32, 5)
        };
        let (fine_checkpoints, fine_terrain) = collect(fine);
        let (coarse_checkpoints, coarse_terrain) = collect(coarse);
        assert!(fine_checkpoints.len() > coarse_checkpoints.len());
        assert_eq!(fine_terrain, coarse_terrain);
    }

    #[test]
    fn test_deterministic() {
        let a = generate(small_config(32, 42)).unwrap();
        let b = generate(small_config(32, 42)).unwrap();
        assert_eq!(a.heights.checksum(), b.heights.checksum());
        assert_eq!(a.mesh, b.mesh);

        let c = generate(small_config(32, 43)).unwrap();
        assert_ne!(a.heights.checksum(), c.heights.checksum());
    }

    #[test]
    fn test_shared_registry_matches_private() {
        let noise = NoiseField::default();
        let shared = GenerationSession::with_noise(small_config(16, 9), noise.clone())
            .unwrap()
            .run_with_progress(|_| {})
            .unwrap();
        assert!(!noise.registry().is_empty());
        let private = generate(small_config(16, 9)).unwrap();
        assert_eq!(shared, private);
    }

    #[test]
    fn test_height_bounds_after_erosion() {
        let config = TerrainConfig {
            erosion: ErosionConfig::with_hydraulic(),
            ..small_config(40, 11)
        };
        let max = config.heights.max_elevation;
        let terrain = generate(config).unwrap();
        for (&h, &land) in terrain.heights.iter().zip(terrain.land_mask.iter()) {
            assert!(h.is_finite());
            if land {
                assert!((0.0..=max).contains(&h), "land height {h}");
            } else {
                assert!(h <= -5.0, "ocean height {h}");
            }
        }
    }

    #[test]
    fn test_ridges_and_peaks_raise_high_terrain() {
        let mut base = TerrainConfig {
            erosion: ErosionConfig::disabled(),
            ..TerrainConfig::new(8000.0, 64, 42)
        };
        for layer in &mut base.heights.layers {
            layer.amplitude *= 20.0;
        }

        let mut flat = base.clone();
        flat.ridges.amplitude = 0.0;
        flat.heights.peaks.gain = 0.0;

        let mut ridged = base.clone();
        ridged.heights.peaks.gain = 0.0;

        let mut peaked = base;
        peaked.ridges.amplitude = 0.0;
        peaked.heights.peaks.threshold = -10.0;
        peaked.heights.peaks.min_base_height = 100.0;
        peaked.heights.peaks.gain = 5.0;

        let flat = generate(flat).unwrap();
        assert!(flat.stats.max_height > 200.0, "max {}", flat.stats.max_height);

        for variant in [generate(ridged).unwrap(), generate(peaked).unwrap()] {
            assert_eq!(variant.land_mask, flat.land_mask);
            let mut raised = 0;
            for (&h, &f) in variant.heights.iter().zip(flat.heights.iter()) {
                assert!(h >= f, "{h} below {f}");
                if h > f {
                    raised += 1;
                }
            }
            assert!(raised > 0);
            assert!(variant.stats.max_height >= flat.stats.max_height);
        }
    }

    #[test]
    fn test_mesh_counts_and_normals() {
        let terrain = generate(small_config(20, 2)).unwrap();
        assert_eq!(terrain.mesh.vertex_count(), 400);
        assert_eq!(terrain.mesh.triangle_count(), 19 * 19 * 2);
        assert_eq!(terrain.stats.vertex_count, 400);
        for n in &terrain.mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
        for (p, &h) in terrain.mesh.positions.iter().zip(terrain.heights.iter()) {
            assert_eq!(p.z, h);
        }
    }

    #[test]
    fn test_all_ocean_world() {
        let mut config = small_config(24, 4);
        config.coastline.radius_fraction = 0.0;
        let terrain = generate(config).unwrap();
        assert_eq!(terrain.land_mask.count(), 0);
        assert!(terrain.heights.iter().all(|&h| h < 0.0));
        assert_eq!(terrain.stats.land_area_km2, 0.0);
        assert_eq!(terrain.mesh.vertex_count(), 24 * 24);
        assert_eq!(terrain.mesh.triangle_count(), 23 * 23 * 2);
    }

    #[test]
    fn test_minimum_resolution() {
        let terrain = generate(small_config(2, 8)).unwrap();
        assert_eq!(terrain.mesh.vertex_count(), 4);
        assert_eq!(terrain.mesh.triangle_count(), 2);
        assert_eq!(terrain.mesh.indices, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn test_no_erosion_skips_straight_to_mesh() {
        let config = TerrainConfig {
            erosion: ErosionConfig::disabled(),
            ..small_config(16, 6)
        };
        let (checkpoints, _) = collect(config);
        let erosion: Vec<_> = checkpoints.iter().filter(|c| c.phase == Phase::Erosion).collect();
        assert_eq!(erosion.len(), 1);
        assert!((erosion[0].progress - Phase::Erosion.span().1).abs() < 1e-6);
    }

    #[test]
    fn test_golden_heightmap_checksum() {
        let config = TerrainConfig {
            erosion: ErosionConfig::disabled(),
            ..TerrainConfig::new(8000.0, 50, 42)
        };
        let terrain = generate(config.clone()).unwrap();
        let checksum = format!("{:016x}", terrain.heights.checksum());
        assert_eq!(
            checksum,
            format!("{:016x}", generate(config).unwrap().heights.checksum())
        );

        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/golden/heightmap_r50_s8000_s42.txt");
        if std::env::var("UPDATE_GOLDEN").map_or(false, |v| v == "1") {
            std::fs::write(&path, format!("{checksum}\n")).unwrap();
            return;
        }
        let expected = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("missing golden file {} ({e}); rerun with UPDATE_GOLDEN=1", path.display()));
        assert_eq!(checksum, expected.trim(), "golden heightmap changed");
    }
}
