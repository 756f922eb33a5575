use crate::bounds::ChunkBounds;
use crate::config::{ConfigError, WorldConfig, MAX_STREAMING_REACH};
use crate::coord::ChunkCoord;
use bevy::prelude::*;

/// The chunk coordinates a world should currently hold.
///
/// Finite worlds always return their full lattice. Streaming worlds return the chunks within
/// the enable distance of `viewer`.
pub fn required_coords(config: &WorldConfig, viewer: Vec3) -> Result<Vec<ChunkCoord>, ConfigError> {
	config.validate()?;

	let coords = if config.world_type.is_streaming() {
		visible_coords(config, viewer)
	} else {
		finite_lattice(config)
	};

	Ok(coords)
}

/// Every coordinate of the finite lattice, x outermost
pub fn finite_lattice(config: &WorldConfig) -> Vec<ChunkCoord> {
	let mut coords = Vec::with_capacity(config.chunk_count());
	for x in 0..config.x_chunks as i32 {
		for y in 0..config.y_chunks as i32 {
			for z in 0..config.z_chunks as i32 {
				coords.push(ChunkCoord::new(x, y, z));
			}
		}
	}
	coords
}

/// Chunks whose bounds come within `chunk_enable_distance` of the viewer.
///
/// Expects a validated config, which bounds the reach. Neighbours past the edge of the `i32`
/// lattice are skipped.
pub fn visible_coords(config: &WorldConfig, viewer: Vec3) -> Vec<ChunkCoord> {
	let distance = config.chunk_enable_distance;
	let centre = ChunkCoord::from_world_pos(viewer, config.chunk_edge);
	let reach = config.streaming_reach().min(MAX_STREAMING_REACH) as i32;

	let mut coords = Vec::new();
	for dx in -reach..=reach {
		for dy in -reach..=reach {
			for dz in -reach..=reach {
				let Some(coord) = centre.offset(dx, dy, dz) else {
					continue;
				};
				if ChunkBounds::for_coord(coord, config).distance_to(viewer) <= distance {
					coords.push(coord);
				}
			}
		}
	}
	coords
}
