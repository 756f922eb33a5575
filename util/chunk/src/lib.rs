pub mod bounds;
pub mod config;
pub mod coord;
pub mod lattice;

pub use bounds::ChunkBounds;
pub use config::{
	ChunkSize, ConfigError, WorldConfig, WorldSize, WorldType, MAX_FINITE_CHUNKS, MAX_RESOLUTION,
	MAX_STREAMING_REACH, MIN_RESOLUTION,
};
pub use coord::ChunkCoord;
pub use lattice::{finite_lattice, required_coords, visible_coords};
