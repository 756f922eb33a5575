use crate::config::{WorldConfig, WorldType};
use crate::coord::ChunkCoord;
use bevy::prelude::*;

/// Corner offsets of a unit cube, bottom face first (y is up).
/// Shared with the marching cubes corner ordering.
pub const CORNER_OFFSETS: [[u8; 3]; 8] = [
	[0, 0, 0],
	[1, 0, 0],
	[1, 0, 1],
	[0, 0, 1],
	[0, 1, 0],
	[1, 1, 0],
	[1, 1, 1],
	[0, 1, 1],
];

/// Corner index pairs of the 12 cube edges
pub const EDGE_CORNERS: [[usize; 2]; 12] = [
	[0, 1],
	[1, 2],
	[2, 3],
	[3, 0],
	[4, 5],
	[5, 6],
	[6, 7],
	[7, 4],
	[0, 4],
	[1, 5],
	[2, 6],
	[3, 7],
];

/// World-space box covered by one chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
	/// the lower left bottom corner of the chunk
	pub min: Vec3,
	pub edge: f32,
}

impl ChunkBounds {
	pub fn new(min: Vec3, edge: f32) -> Self {
		Self { min, edge }
	}

	/// Bounds of the chunk at `coord`.
	///
	/// Finite worlds center the whole lattice on the origin. Every other topology places the
	/// chunk's lower corner at `coord * edge`.
	pub fn for_coord(coord: ChunkCoord, config: &WorldConfig) -> Self {
		let edge = config.chunk_edge;
		let min = match config.world_type {
			WorldType::Finite => -config.world_extent() / 2.0 + coord.as_vec3() * edge,
			WorldType::Infinite | WorldType::Spherical | WorldType::Cavernous => {
				coord.as_vec3() * edge
			}
		};
		Self { min, edge }
	}

	pub fn max(&self) -> Vec3 {
		self.min + Vec3::splat(self.edge)
	}

	pub fn centre(&self) -> Vec3 {
		self.min + Vec3::splat(self.edge * 0.5)
	}

	pub fn contains(&self, p: Vec3) -> bool {
		let max = self.max();
		p.cmpge(self.min).all() && p.cmple(max).all()
	}

	/// The 8 corner points, ordered like [`CORNER_OFFSETS`]
	pub fn corners(&self) -> [Vec3; 8] {
		CORNER_OFFSETS.map(|[x, y, z]| {
			self.min + Vec3::new(x as f32, y as f32, z as f32) * self.edge
		})
	}

	/// The 12 outline segments between corners, for wireframe debug drawing
	pub fn edges(&self) -> [(Vec3, Vec3); 12] {
		let corners = self.corners();
		EDGE_CORNERS.map(|[a, b]| (corners[a], corners[b]))
	}

	/// Distance from `p` to the closest point of the box; zero inside
	pub fn distance_to(&self, p: Vec3) -> f32 {
		let closest = p.clamp(self.min, self.max());
		closest.distance(p)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_finite_lattice_is_centered() {
		let config = WorldConfig::finite(2, 1, 2, 32.0);

		let first = ChunkBounds::for_coord(ChunkCoord::new(0, 0, 0), &config);
		assert_eq!(first.min, Vec3::new(-32.0, -16.0, -32.0));

		let last = ChunkBounds::for_coord(ChunkCoord::new(1, 0, 1), &config);
		assert_eq!(last.max(), Vec3::new(32.0, 16.0, 32.0));
	}

	#[test]
	fn test_single_finite_chunk_centre_is_origin() {
		let config = WorldConfig::finite(1, 1, 1, 32.0);
		let bounds = ChunkBounds::for_coord(ChunkCoord::ORIGIN, &config);
		assert_eq!(bounds.centre(), Vec3::ZERO);
	}

	#[test]
	fn test_streaming_chunks_tile_from_origin() {
		let config = WorldConfig { chunk_edge: 10.0, ..WorldConfig::default() };
		let bounds = ChunkBounds::for_coord(ChunkCoord::new(-1, 2, 3), &config);
		assert_eq!(bounds.min, Vec3::new(-10.0, 20.0, 30.0));
		assert_eq!(bounds.max(), Vec3::new(0.0, 30.0, 40.0));
	}

	#[test]
	fn test_corners_and_edges() {
		let bounds = ChunkBounds::new(Vec3::new(1.0, 2.0, 3.0), 2.0);
		let corners = bounds.corners();

		assert_eq!(corners[0], bounds.min);
		assert_eq!(corners[6], bounds.max());
		for corner in corners {
			assert!(bounds.contains(corner));
		}

		// every outline segment runs along exactly one axis with the chunk's edge length
		for (a, b) in bounds.edges() {
			assert!((a.distance(b) - 2.0).abs() < 1e-6);
			let delta = (b - a).abs();
			let axes = [delta.x, delta.y, delta.z].iter().filter(|d| **d > 0.0).count();
			assert_eq!(axes, 1);
		}
	}

	#[test]
	fn test_distance_to() {
		let bounds = ChunkBounds::new(Vec3::ZERO, 10.0);
		assert_eq!(bounds.distance_to(Vec3::splat(5.0)), 0.0);
		assert!((bounds.distance_to(Vec3::new(13.0, 5.0, 14.0)) - 5.0).abs() < 1e-6);
		assert!((bounds.distance_to(Vec3::new(-2.0, 5.0, 5.0)) - 2.0).abs() < 1e-6);
	}
}
