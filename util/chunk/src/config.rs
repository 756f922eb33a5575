use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest number of sample points per axis that still yields one cell
pub const MIN_RESOLUTION: usize = 2;
/// Largest number of sample points per axis accepted by the settings surface
pub const MAX_RESOLUTION: usize = 100;
/// Upper bound on lattice dimensions for finite worlds
pub const MAX_FINITE_CHUNKS: u32 = 512;
/// Most chunks a streaming world reaches out from the viewer's chunk along each axis
pub const MAX_STREAMING_REACH: u32 = 32;

/// Largest preset edge length that still maps onto a named world size
const LARGEST_PRESET_EDGE: f32 = 2048.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	#[error("resolution {resolution} is outside 2..=100 points per axis")]
	ResolutionOutOfRange { resolution: usize },
	#[error("chunk edge length must be finite and positive, got {0}")]
	InvalidEdgeLength(f32),
	#[error("sample spacing must be finite and positive, got {0}")]
	InvalidSpacing(f32),
	#[error("lattice dimension {axis} must be at least 1, got {value}")]
	LatticeTooSmall { axis: char, value: u32 },
	#[error("finite lattice dimension {axis} must be at most 512, got {value}")]
	LatticeTooLarge { axis: char, value: u32 },
	#[error("iso-level must be finite, got {0}")]
	InvalidIsoLevel(f32),
	#[error("chunk enable distance must be finite and non-negative, got {0}")]
	InvalidEnableDistance(f32),
	#[error("chunk enable distance reaches {reach} chunks from the viewer, at most 32 are streamed")]
	StreamingReachTooLarge { reach: u32 },
}

/// World topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorldType {
	/// Unbounded noise terrain, streamed around a viewer
	#[default]
	Infinite,
	/// A fixed lattice of chunks centered on the origin
	Finite,
	/// A sphere streamed around a viewer
	Spherical,
	/// Unbounded 3D noise caverns, streamed around a viewer
	Cavernous,
}

impl WorldType {
	/// Every topology except [`WorldType::Finite`] decides its chunks from a viewer position
	pub fn is_streaming(&self) -> bool {
		!matches!(self, WorldType::Finite)
	}
}

/// Named world size presets for finite worlds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorldSize {
	Miniscule,
	#[default]
	Tiny,
	Small,
	Medium,
	Large,
	Custom,
}

impl WorldSize {
	/// The chunk size a preset selects. [`WorldSize::Custom`] has none.
	pub fn preset(&self) -> Option<ChunkSize> {
		match self {
			WorldSize::Miniscule => Some(ChunkSize::Is32MetersCu),
			WorldSize::Tiny => Some(ChunkSize::Is256MetersCu),
			WorldSize::Small => Some(ChunkSize::Is512MetersCu),
			WorldSize::Medium => Some(ChunkSize::Is1024MetersCu),
			WorldSize::Large => Some(ChunkSize::Is2048MetersCu),
			WorldSize::Custom => None,
		}
	}
}

/// Chunk edge lengths offered by the settings surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum ChunkSize {
	#[default]
	Is32MetersCu = 32,
	Is40MetersSq = 40,
	Is256MetersCu = 256,
	Is512MetersCu = 512,
	Is1024MetersCu = 1024,
	Is2048MetersCu = 2048,
	Is4096MetersCu = 4096,
	Is8192MetersCu = 8192,
	Is16384MetersCu = 16384,
}

impl ChunkSize {
	pub fn edge_length(self) -> f32 {
		self as u32 as f32
	}
}

/// Per-run world configuration consumed by the chunk manager and the surface extractor
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
	pub world_type: WorldType,
	pub world_size: WorldSize,
	/// Preset the edge length was last taken from
	pub chunk_size: ChunkSize,
	/// Edge length of one cubic chunk in world units
	pub chunk_edge: f32,
	pub x_chunks: u32,
	pub y_chunks: u32,
	pub z_chunks: u32,
	/// Sample points per axis per chunk
	pub resolution: usize,
	pub iso_level: f32,
	pub terrain_height: f32,
	pub noise_threshold: f32,
	/// Weight of the noise term in the density function
	pub noise_weight: f32,
	pub seed: u32,
	/// Streaming radius around the viewer
	pub chunk_enable_distance: f32,
	/// Apply settings changes automatically while the chunk manager is idle
	pub auto_update_idle: bool,
	/// Apply settings changes automatically while the chunk manager is running
	pub auto_update_running: bool,
	pub smooth_terrain: bool,
	pub flat_shaded: bool,
	pub generate_collider: bool,
	pub draw_chunk_outline: bool,
}

impl Default for WorldConfig {
	fn default() -> Self {
		Self {
			world_type: WorldType::Infinite,
			world_size: WorldSize::Tiny,
			chunk_size: ChunkSize::Is256MetersCu,
			chunk_edge: ChunkSize::Is256MetersCu.edge_length(),
			x_chunks: 1,
			y_chunks: 1,
			z_chunks: 1,
			resolution: 45,
			iso_level: 0.0,
			terrain_height: 8.0,
			noise_threshold: 0.6,
			noise_weight: 4.0,
			seed: 651615,
			chunk_enable_distance: 100.0,
			auto_update_idle: true,
			auto_update_running: true,
			smooth_terrain: false,
			flat_shaded: false,
			generate_collider: false,
			draw_chunk_outline: false,
		}
	}
}

impl WorldConfig {
	/// A finite world with the given lattice and edge length
	pub fn finite(x_chunks: u32, y_chunks: u32, z_chunks: u32, chunk_edge: f32) -> Self {
		Self {
			world_type: WorldType::Finite,
			world_size: WorldSize::Custom,
			chunk_edge,
			x_chunks,
			y_chunks,
			z_chunks,
			..Default::default()
		}
	}

	/// Rejects configurations that would produce a degenerate field or lattice.
	/// Runs before any buffer is allocated.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
			return Err(ConfigError::ResolutionOutOfRange { resolution: self.resolution });
		}
		if !self.chunk_edge.is_finite() || self.chunk_edge <= 0.0 {
			return Err(ConfigError::InvalidEdgeLength(self.chunk_edge));
		}
		for (axis, value) in [('x', self.x_chunks), ('y', self.y_chunks), ('z', self.z_chunks)] {
			if value < 1 {
				return Err(ConfigError::LatticeTooSmall { axis, value });
			}
			if self.world_type == WorldType::Finite && value > MAX_FINITE_CHUNKS {
				return Err(ConfigError::LatticeTooLarge { axis, value });
			}
		}
		if !self.iso_level.is_finite() {
			return Err(ConfigError::InvalidIsoLevel(self.iso_level));
		}
		if !self.chunk_enable_distance.is_finite() || self.chunk_enable_distance < 0.0 {
			return Err(ConfigError::InvalidEnableDistance(self.chunk_enable_distance));
		}
		if self.world_type.is_streaming() {
			let reach = self.streaming_reach();
			if reach > MAX_STREAMING_REACH {
				return Err(ConfigError::StreamingReachTooLarge { reach });
			}
		}
		Ok(())
	}

	/// Whether a settings change remeshes on its own in the given run state
	pub fn auto_update(&self, running: bool) -> bool {
		if running {
			self.auto_update_running
		} else {
			self.auto_update_idle
		}
	}

	/// Chunks between the viewer's chunk and the furthest chunk within the enable distance
	pub fn streaming_reach(&self) -> u32 {
		(self.chunk_enable_distance / self.chunk_edge).ceil() as u32
	}

	/// Distance between neighbouring sample points
	pub fn spacing(&self) -> f32 {
		self.chunk_edge / (self.resolution.saturating_sub(1)).max(1) as f32
	}

	pub fn lattice(&self) -> UVec3 {
		UVec3::new(self.x_chunks, self.y_chunks, self.z_chunks)
	}

	/// Extent of the whole finite lattice in world units
	pub fn world_extent(&self) -> Vec3 {
		self.lattice().as_vec3() * self.chunk_edge
	}

	pub fn chunk_count(&self) -> usize {
		self.x_chunks as usize * self.y_chunks as usize * self.z_chunks as usize
	}

	/// Applies a named world size. Presets use a single chunk of the preset's edge length.
	pub fn apply_world_size(&mut self, world_size: WorldSize) {
		self.world_size = world_size;
		if let Some(chunk_size) = world_size.preset() {
			self.chunk_size = chunk_size;
			self.chunk_edge = chunk_size.edge_length();
			self.x_chunks = 1;
			self.y_chunks = 1;
			self.z_chunks = 1;
		}
	}

	/// Selects a chunk size and reclassifies the world size from the resulting layout
	pub fn set_chunk_size(&mut self, chunk_size: ChunkSize) {
		self.chunk_size = chunk_size;
		self.chunk_edge = chunk_size.edge_length();

		self.world_size = if self.x_chunks > 1 || self.z_chunks > 1 || self.chunk_edge > LARGEST_PRESET_EDGE
		{
			WorldSize::Custom
		} else {
			match chunk_size {
				ChunkSize::Is32MetersCu => WorldSize::Miniscule,
				ChunkSize::Is256MetersCu => WorldSize::Tiny,
				ChunkSize::Is512MetersCu => WorldSize::Small,
				ChunkSize::Is1024MetersCu => WorldSize::Medium,
				ChunkSize::Is2048MetersCu => WorldSize::Large,
				_ => self.world_size,
			}
		};

		self.x_chunks = self.x_chunks.clamp(1, MAX_FINITE_CHUNKS);
		self.y_chunks = self.y_chunks.clamp(1, MAX_FINITE_CHUNKS);
		self.z_chunks = self.z_chunks.clamp(1, MAX_FINITE_CHUNKS);
	}

	/// Picks a new random seed and returns it
	pub fn randomize_seed(&mut self) -> u32 {
		self.seed = rand::rng().random_range(0..i32::MAX as u32);
		log::debug!("Randomized world seed to {}", self.seed);
		self.seed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config_is_valid() {
		assert_eq!(WorldConfig::default().validate(), Ok(()));
	}

	#[test]
	fn test_resolution_bounds() {
		let mut config = WorldConfig::default();

		config.resolution = 1;
		assert_eq!(config.validate(), Err(ConfigError::ResolutionOutOfRange { resolution: 1 }));

		config.resolution = 101;
		assert_eq!(config.validate(), Err(ConfigError::ResolutionOutOfRange { resolution: 101 }));

		config.resolution = 2;
		assert_eq!(config.validate(), Ok(()));

		config.resolution = 100;
		assert_eq!(config.validate(), Ok(()));
	}

	#[test]
	fn test_edge_length_must_be_positive() {
		let mut config = WorldConfig::default();

		config.chunk_edge = 0.0;
		assert_eq!(config.validate(), Err(ConfigError::InvalidEdgeLength(0.0)));

		config.chunk_edge = -4.0;
		assert_eq!(config.validate(), Err(ConfigError::InvalidEdgeLength(-4.0)));

		config.chunk_edge = f32::INFINITY;
		assert!(matches!(config.validate(), Err(ConfigError::InvalidEdgeLength(_))));
	}

	#[test]
	fn test_lattice_limits() {
		let config = WorldConfig::finite(1, 0, 1, 32.0);
		assert_eq!(config.validate(), Err(ConfigError::LatticeTooSmall { axis: 'y', value: 0 }));

		let config = WorldConfig::finite(513, 1, 1, 32.0);
		assert_eq!(config.validate(), Err(ConfigError::LatticeTooLarge { axis: 'x', value: 513 }));

		// the upper bound only applies to finite worlds
		let config = WorldConfig { world_type: WorldType::Infinite, ..WorldConfig::finite(513, 1, 1, 32.0) };
		assert_eq!(config.validate(), Ok(()));
	}

	#[test]
	fn test_streaming_reach_is_bounded() {
		let mut config =
			WorldConfig { world_type: WorldType::Infinite, chunk_edge: 32.0, ..WorldConfig::default() };

		config.chunk_enable_distance = 1024.0;
		assert_eq!(config.streaming_reach(), 32);
		assert_eq!(config.validate(), Ok(()));

		config.chunk_enable_distance = 3200.0;
		assert_eq!(config.validate(), Err(ConfigError::StreamingReachTooLarge { reach: 100 }));

		// finite worlds never stream, so the distance is not bounded for them
		config.world_type = WorldType::Finite;
		assert_eq!(config.validate(), Ok(()));
	}

	#[test]
	fn test_auto_update_follows_run_state() {
		let config =
			WorldConfig { auto_update_idle: false, auto_update_running: true, ..WorldConfig::default() };
		assert!(!config.auto_update(false));
		assert!(config.auto_update(true));
	}

	#[test]
	fn test_spacing() {
		let config = WorldConfig { resolution: 10, ..WorldConfig::finite(1, 1, 1, 36.0) };
		assert!((config.spacing() - 4.0).abs() < 1e-6);

		let config = WorldConfig { resolution: 2, ..WorldConfig::finite(1, 1, 1, 32.0) };
		assert!((config.spacing() - 32.0).abs() < 1e-6);
	}

	#[test]
	fn test_world_size_presets() {
		let mut config = WorldConfig::finite(4, 2, 3, 40.0);

		config.apply_world_size(WorldSize::Medium);
		assert_eq!(config.chunk_size, ChunkSize::Is1024MetersCu);
		assert_eq!(config.chunk_edge, 1024.0);
		assert_eq!(config.lattice(), UVec3::ONE);

		config.apply_world_size(WorldSize::Miniscule);
		assert_eq!(config.chunk_edge, 32.0);

		// custom keeps whatever the user set
		config.x_chunks = 3;
		config.apply_world_size(WorldSize::Custom);
		assert_eq!(config.x_chunks, 3);
		assert_eq!(config.chunk_edge, 32.0);
	}

	#[test]
	fn test_set_chunk_size_reclassifies_world_size() {
		let mut config = WorldConfig::finite(1, 1, 1, 32.0);

		config.set_chunk_size(ChunkSize::Is512MetersCu);
		assert_eq!(config.world_size, WorldSize::Small);
		assert_eq!(config.chunk_edge, 512.0);

		config.set_chunk_size(ChunkSize::Is4096MetersCu);
		assert_eq!(config.world_size, WorldSize::Custom);

		config.x_chunks = 2;
		config.set_chunk_size(ChunkSize::Is32MetersCu);
		assert_eq!(config.world_size, WorldSize::Custom);

		config.y_chunks = 0;
		config.z_chunks = 900;
		config.set_chunk_size(ChunkSize::Is32MetersCu);
		assert_eq!(config.y_chunks, 1);
		assert_eq!(config.z_chunks, MAX_FINITE_CHUNKS);
	}

	#[test]
	fn test_randomize_seed_stays_in_range() {
		let mut config = WorldConfig::default();
		for _ in 0..16 {
			let seed = config.randomize_seed();
			assert_eq!(seed, config.seed);
			assert!(seed < i32::MAX as u32);
		}
	}

	#[test]
	fn test_partial_toml_falls_back_to_defaults() -> Result<(), String> {
		let config: WorldConfig = toml::from_str(
			r#"
			world_type = "Finite"
			x_chunks = 2
			resolution = 12
			"#,
		)
		.map_err(|e| e.to_string())?;

		assert_eq!(config.world_type, WorldType::Finite);
		assert_eq!(config.x_chunks, 2);
		assert_eq!(config.resolution, 12);
		assert_eq!(config.seed, WorldConfig::default().seed);
		assert_eq!(config.validate(), Ok(()));
		Ok(())
	}
}
