use bevy::prelude::*;
use std::fmt;

/// Chunk coordinate in the chunk lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
	pub x: i32,
	pub y: i32,
	pub z: i32,
}

impl ChunkCoord {
	pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

	pub fn new(x: i32, y: i32, z: i32) -> Self {
		Self { x, y, z }
	}

	/// Coordinate of the chunk containing `world_pos` when chunks tile from the origin
	///
	/// Positions beyond the `i32` lattice saturate to its outermost chunk.
	pub fn from_world_pos(world_pos: Vec3, chunk_edge: f32) -> Self {
		(world_pos / chunk_edge).floor().as_ivec3().into()
	}

	/// The coordinate `(dx, dy, dz)` chunks away, or `None` when it falls off the lattice
	pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
		Some(Self {
			x: self.x.checked_add(dx)?,
			y: self.y.checked_add(dy)?,
			z: self.z.checked_add(dz)?,
		})
	}

	pub fn as_vec3(&self) -> Vec3 {
		IVec3::from(*self).as_vec3()
	}
}

impl From<IVec3> for ChunkCoord {
	fn from(v: IVec3) -> Self {
		Self { x: v.x, y: v.y, z: v.z }
	}
}

impl From<ChunkCoord> for IVec3 {
	fn from(c: ChunkCoord) -> Self {
		IVec3::new(c.x, c.y, c.z)
	}
}

impl fmt::Display for ChunkCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {}, {})", self.x, self.y, self.z)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_world_pos_floors_negative_positions() {
		assert_eq!(ChunkCoord::from_world_pos(Vec3::new(0.0, 0.0, 0.0), 32.0), ChunkCoord::ORIGIN);
		assert_eq!(
			ChunkCoord::from_world_pos(Vec3::new(31.9, 32.0, -0.1), 32.0),
			ChunkCoord::new(0, 1, -1)
		);
		assert_eq!(
			ChunkCoord::from_world_pos(Vec3::new(-64.0, -65.0, 100.0), 32.0),
			ChunkCoord::new(-2, -3, 3)
		);
	}

	#[test]
	fn test_far_positions_saturate_to_the_lattice_edge() {
		let coord = ChunkCoord::from_world_pos(Vec3::new(1.0e11, -1.0e11, 0.0), 32.0);
		assert_eq!(coord, ChunkCoord::new(i32::MAX, i32::MIN, 0));
	}

	#[test]
	fn test_offset_stops_at_the_lattice_edge() {
		let edge = ChunkCoord::new(i32::MAX, 0, i32::MIN);
		assert_eq!(edge.offset(1, 0, 0), None);
		assert_eq!(edge.offset(0, 0, -1), None);
		assert_eq!(edge.offset(-1, 5, 1), Some(ChunkCoord::new(i32::MAX - 1, 5, i32::MIN + 1)));
	}

	#[test]
	fn test_ivec3_conversion() {
		let coord = ChunkCoord::new(3, -4, 5);
		let v: IVec3 = coord.into();
		assert_eq!(ChunkCoord::from(v), coord);
		assert_eq!(coord.to_string(), "(3, -4, 5)");
	}
}
