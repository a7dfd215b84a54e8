//! Terrainsynth CLI - procedural island terrain generator.
//!
//! Drives a resumable generation session headlessly and reports progress,
//! timing and terrain statistics.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use terrainsynth::mesh::TerrainVertex;
use terrainsynth::pipeline::{format_duration, format_eta, GenerationSession, Phase, Step, TerrainConfig};

/// Procedural island terrain generator.
#[derive(Parser)]
#[command(name = "terrainsynth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the defaults or the `--config` file.
#[derive(clap::Args)]
struct WorldArgs {
    /// TOML configuration file (missing fields keep their defaults).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World width in meters.
    #[arg(long)]
    size: Option<f32>,

    /// Samples per axis.
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Continental radius as a fraction of world size (0 = all ocean).
    #[arg(long)]
    continent_radius: Option<f32>,

    /// Thermal erosion iterations.
    #[arg(long)]
    erosion_iters: Option<u32>,

    /// Talus threshold in meters.
    #[arg(long)]
    talus: Option<f32>,

    /// Fraction of the excess slope moved per iteration (0-1).
    #[arg(long)]
    flow_fraction: Option<f32>,

    /// Enable hydraulic erosion after the thermal pass.
    #[arg(long)]
    hydraulic: bool,
}

impl WorldArgs {
    fn into_config(self) -> Result<TerrainConfig, terrainsynth::pipeline::ConfigError> {
        let mut config = match &self.config {
            Some(path) => TerrainConfig::read(path)?,
            None => TerrainConfig::default(),
        };
        if let Some(size) = self.size {
            config.extent.size = size;
        }
        if let Some(resolution) = self.resolution {
            config.extent.resolution = resolution;
        }
        config.seed = match self.seed {
            Some(seed) => seed,
            None if self.config.is_some() => config.seed,
            None => rand::random(),
        };
        if let Some(radius) = self.continent_radius {
            config.coastline.radius_fraction = radius;
        }
        if let Some(iters) = self.erosion_iters {
            config.erosion.thermal_iterations = iters;
        }
        if let Some(talus) = self.talus {
            config.erosion.talus = talus;
        }
        if let Some(fraction) = self.flow_fraction {
            config.erosion.thermal_strength = fraction;
        }
        if self.hydraulic {
            config.erosion.hydraulic_enabled = true;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain and report statistics.
    Generate {
        #[command(flatten)]
        world: WorldArgs,

        /// Grid rows processed per checkpoint.
        #[arg(long)]
        checkpoint_rows: Option<usize>,

        /// Print every checkpoint as a progress line.
        #[arg(long)]
        progress: bool,

        /// Print the effective configuration as TOML before generating.
        #[arg(long)]
        print_config: bool,
    },

    /// Display derived quantities of a configuration without generating.
    Info {
        #[command(flatten)]
        world: WorldArgs,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            world,
            checkpoint_rows,
            progress,
            print_config,
        } => {
            let mut config = world.into_config().unwrap_or_else(|e| exit_with(&e));
            if let Some(rows) = checkpoint_rows {
                config.checkpoint_rows = rows;
            }
            run_generate(config, progress, print_config);
        }
        Commands::Info { world } => {
            let config = world.into_config().unwrap_or_else(|e| exit_with(&e));
            print_info(&config);
        }
    }
}

fn exit_with(error: &dyn std::fmt::Display) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

fn run_generate(config: TerrainConfig, show_progress: bool, print_config: bool) {
    if print_config {
        match config.to_toml_string() {
            Ok(text) => println!("{text}"),
            Err(e) => exit_with(&e),
        }
    }

    println!("Terrainsynth - Procedural Terrain Generator");
    println!("===========================================");
    println!(
        "World: {:.0}m, {}x{} samples",
        config.extent.size, config.extent.resolution, config.extent.resolution
    );
    println!("Seed: {}", config.seed);

    let start = Instant::now();
    let mut session = GenerationSession::new(config).unwrap_or_else(|e| exit_with(&e));

    let terrain = loop {
        match session.resume() {
            Ok(Step::Checkpoint(checkpoint)) => {
                if show_progress {
                    println!(
                        "  [{:>2}/{}] {:>5.1}% {} (eta {})",
                        checkpoint.phase_number(),
                        Phase::COUNT,
                        checkpoint.progress * 100.0,
                        checkpoint.description,
                        format_eta(session.eta())
                    );
                }
            }
            Ok(Step::Finished(terrain)) => break terrain,
            Err(e) => exit_with(&e),
        }
    };

    let stats = &terrain.stats;
    println!("Generation completed in {}", format_duration(start.elapsed()));
    println!("Height range: [{:.1}m, {:.1}m]", stats.min_height, stats.max_height);
    println!(
        "Land: {} cells, {:.2} km² ({:.1}%)",
        stats.land_cells,
        stats.land_area_km2,
        stats.land_fraction * 100.0
    );
    println!(
        "Mesh: {} vertices, {} triangles ({} KiB vertex data, {} KiB index data)",
        terrain.mesh.vertex_count(),
        terrain.mesh.triangle_count(),
        terrain.mesh.vertex_count() * std::mem::size_of::<TerrainVertex>() / 1024,
        terrain.mesh.index_bytes().len() / 1024
    );
}

fn print_info(config: &TerrainConfig) {
    let extent = &config.extent;
    let n = extent.resolution;
    let quads = (n - 1) * (n - 1);

    println!("Terrain Configuration");
    println!("=====================");
    println!("World size: {:.0}m ({:.2} km²)", extent.size, extent.area_km2());
    println!("Resolution: {}x{} samples", n, n);
    println!("Grid spacing: {:.2}m", extent.spacing());
    println!("Vertices: {}", n * n);
    println!("Triangles: {}", quads * 2);
    println!(
        "Vertex buffer: {:.2} MiB",
        (n * n * std::mem::size_of::<TerrainVertex>()) as f64 / (1024.0 * 1024.0)
    );
    println!(
        "Index buffer: {:.2} MiB",
        (quads * 6 * std::mem::size_of::<u32>()) as f64 / (1024.0 * 1024.0)
    );
    println!("Seed: {}", config.seed);
    println!(
        "Continental radius: {:.0}m",
        config.coastline.radius_fraction * extent.size
    );
    println!(
        "Erosion: {} thermal iterations (talus {:.1}m, flow {:.2}), hydraulic {}",
        config.erosion.thermal_iterations,
        config.erosion.talus,
        config.erosion.thermal_strength,
        if config.erosion.hydraulic_enabled {
            format!("{} steps", config.erosion.hydraulic_steps)
        } else {
            "off".to_string()
        }
    );
    println!("Checkpoints per run: ~{}", estimate_checkpoints(config));
}

/// Approximate number of checkpoints a session will emit.
fn estimate_checkpoints(config: &TerrainConfig) -> usize {
    let n = config.extent.resolution;
    let batch = config.checkpoint_rows.max(1);
    let rows = |count: usize| count.div_ceil(batch).max(1);
    let coarse = |divisor: usize| terrainsynth::noise::coarse_resolution(n, divisor);
    // setup, mesh setup, assembly, stats
    4 + rows(coarse(config.warp.coarse_divisor))
        + rows(coarse(config.coastline.coarse_divisor))
        + rows(coarse(config.heights.coarse_divisor))
        + rows(n)
        + (config.erosion.total_iterations() as usize).max(1)
        + rows(n) * 2
        + rows(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_args(args: &[&str]) -> WorldArgs {
        let mut argv = vec!["terrainsynth", "info"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Info { world } => world,
            Commands::Generate { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_overrides_apply_before_validation() {
        let path = std::env::temp_dir().join(format!("terrainsynth-{}-bad-resolution.toml", std::process::id()));
        std::fs::write(&path, "seed = 3\n\n[extent]\nresolution = 1\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let rejected = world_args(&["--config", &path_arg]).into_config();
        let fixed = world_args(&["--config", &path_arg, "--resolution", "64"]).into_config();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            rejected,
            Err(terrainsynth::pipeline::ConfigError::InvalidResolution(1))
        ));
        let config = fixed.unwrap();
        assert_eq!(config.extent.resolution, 64);
        assert_eq!(config.seed, 3);
    }
}
