use anyhow::Context;
use bevy::prelude::*;
use chunk::{WorldConfig, WorldType};
use clap::{Parser, ValueEnum};
use engine::{ChunkManager, RemeshReport};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WorldTypeArg {
	Infinite,
	Finite,
	Spherical,
	Cavernous,
}

impl From<WorldTypeArg> for WorldType {
	fn from(arg: WorldTypeArg) -> Self {
		match arg {
			WorldTypeArg::Infinite => WorldType::Infinite,
			WorldTypeArg::Finite => WorldType::Finite,
			WorldTypeArg::Spherical => WorldType::Spherical,
			WorldTypeArg::Cavernous => WorldType::Cavernous,
		}
	}
}

/// Builds a marching cubes world without a window and logs what was meshed
#[derive(Parser, Debug, Clone)]
#[command(name = "terrain-playground")]
pub struct Args {
	/// TOML file with a world configuration; missing keys use the defaults
	#[arg(long)]
	pub config: Option<PathBuf>,

	#[arg(long, value_enum)]
	pub world_type: Option<WorldTypeArg>,

	/// Sample points per chunk axis
	#[arg(long)]
	pub resolution: Option<usize>,

	#[arg(long)]
	pub seed: Option<u32>,

	/// Pick a random seed, overriding --seed
	#[arg(long)]
	pub random_seed: bool,

	#[arg(long, allow_hyphen_values = true)]
	pub iso_level: Option<f32>,

	/// Viewer steps to simulate in streaming worlds
	#[arg(long, default_value_t = 8)]
	pub steps: u32,
}

/// Parses a TOML world configuration
pub fn parse_config(text: &str) -> Result<WorldConfig, anyhow::Error> {
	toml::from_str(text).context("failed to parse world configuration")
}

/// Applies command line overrides on top of `config`
pub fn merge_args(mut config: WorldConfig, args: &Args) -> WorldConfig {
	if let Some(world_type) = args.world_type {
		config.world_type = world_type.into();
	}
	if let Some(resolution) = args.resolution {
		config.resolution = resolution;
	}
	if let Some(seed) = args.seed {
		config.seed = seed;
	}
	if args.random_seed {
		config.randomize_seed();
	}
	if let Some(iso_level) = args.iso_level {
		config.iso_level = iso_level;
	}
	config
}

pub fn load_config(args: &Args) -> Result<WorldConfig, anyhow::Error> {
	let config = match &args.config {
		Some(path) => {
			let text = std::fs::read_to_string(path)
				.with_context(|| format!("failed to read {}", path.display()))?;
			parse_config(&text)?
		}
		None => WorldConfig::default(),
	};

	let config = merge_args(config, args);
	config.validate().context("invalid world configuration")?;
	Ok(config)
}

pub fn run(args: &Args) -> Result<(), anyhow::Error> {
	let config = load_config(args)?;
	log::info!(
		"Building {:?} world: {} m chunks, {} points per axis, seed {}",
		config.world_type,
		config.chunk_edge,
		config.resolution,
		config.seed
	);

	let mut manager = ChunkManager::new(config)?;

	if manager.config().world_type.is_streaming() {
		manager.set_running(true);
		let stride = manager.config().chunk_edge * 0.5;
		for step in 0..args.steps {
			let viewer = Vec3::new(step as f32 * stride, 0.0, 0.0);
			let report = manager.update(viewer)?;
			log::info!(
				"Step {}: viewer at {}, {} live chunks, {} recycled",
				step,
				viewer,
				manager.len(),
				manager.recycled_len()
			);
			log_report(&report);
		}
		manager.set_running(false);
	} else {
		let report = manager.run(Vec3::ZERO)?;
		log_report(&report);
	}

	let (vertex_bytes, index_bytes) = mesh_bytes(&manager);
	log::info!(
		"Finished with {} chunks, {} bytes of vertex positions, {} bytes of indices",
		manager.len(),
		vertex_bytes,
		index_bytes
	);
	Ok(())
}

/// Total position and index buffer sizes across every live chunk
pub fn mesh_bytes(manager: &ChunkManager) -> (usize, usize) {
	manager.chunks().iter().fold((0, 0), |(positions, indices), chunk| {
		let mesh = chunk.mesh();
		(positions + mesh.position_bytes().len(), indices + mesh.index_bytes().len())
	})
}

fn log_report(report: &RemeshReport) {
	for stats in &report.remeshed {
		log::info!(
			"Chunk {}: {} triangles, {} vertices in {:?}",
			stats.coord,
			stats.triangles,
			stats.vertices,
			stats.elapsed
		);
	}
	for (coord, error) in &report.failed {
		log::warn!("Chunk {} failed: {}", coord, error);
	}
}
