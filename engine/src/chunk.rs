use crate::mesh::ChunkMesh;
use bevy::prelude::*;
use chunk::{ChunkBounds, ChunkCoord};
use std::fmt;

/// Identity of a chunk instance. Never reused, even when storage is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u64);

impl fmt::Display for ChunkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// One live region of the world and its current mesh
#[derive(Debug)]
pub struct Chunk {
	id: ChunkId,
	coord: ChunkCoord,
	bounds: ChunkBounds,
	mesh: ChunkMesh,
	active: bool,
	pub draw_outline: bool,
}

impl Chunk {
	pub fn new(id: ChunkId, coord: ChunkCoord, bounds: ChunkBounds) -> Self {
		Self { id, coord, bounds, mesh: ChunkMesh::default(), active: true, draw_outline: false }
	}

	pub fn id(&self) -> ChunkId {
		self.id
	}

	pub fn coord(&self) -> ChunkCoord {
		self.coord
	}

	pub fn bounds(&self) -> &ChunkBounds {
		&self.bounds
	}

	pub fn mesh(&self) -> &ChunkMesh {
		&self.mesh
	}

	pub fn is_active(&self) -> bool {
		self.active
	}

	/// The 8 bounding corners, for outline drawing
	pub fn corners(&self) -> [Vec3; 8] {
		self.bounds.corners()
	}

	pub fn outline(&self) -> [(Vec3, Vec3); 12] {
		self.bounds.edges()
	}

	pub fn set_bounds(&mut self, bounds: ChunkBounds) {
		self.bounds = bounds;
	}

	/// Swaps in a fully built mesh, returning the previous one
	pub fn replace_mesh(&mut self, mesh: ChunkMesh) -> ChunkMesh {
		std::mem::replace(&mut self.mesh, mesh)
	}

	/// Clears the mesh and disables the chunk
	pub fn deactivate(&mut self) {
		self.mesh.clear();
		self.active = false;
	}

	/// Reuses this chunk's storage for a new chunk
	pub fn recycle(&mut self, id: ChunkId, coord: ChunkCoord, bounds: ChunkBounds) {
		self.mesh.clear();
		self.id = id;
		self.coord = coord;
		self.bounds = bounds;
		self.active = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mesh::MeshOptions;
	use crate::triangle::Triangle;

	fn some_mesh() -> ChunkMesh {
		let triangles = [Triangle::new(Vec3::ZERO, Vec3::Z, Vec3::X)];
		match ChunkMesh::from_triangles(&triangles, &MeshOptions::default()) {
			Ok(mesh) => mesh,
			Err(e) => panic!("mesh assembly failed: {e}"),
		}
	}

	#[test]
	fn test_deactivate_clears_mesh() {
		let mut chunk = Chunk::new(ChunkId(1), ChunkCoord::ORIGIN, ChunkBounds::new(Vec3::ZERO, 8.0));
		let previous = chunk.replace_mesh(some_mesh());
		assert!(previous.is_empty());
		assert_eq!(chunk.mesh().triangle_count(), 1);

		chunk.deactivate();
		assert!(!chunk.is_active());
		assert!(chunk.mesh().is_empty());
	}

	#[test]
	fn test_recycle_takes_new_identity() {
		let mut chunk = Chunk::new(ChunkId(1), ChunkCoord::ORIGIN, ChunkBounds::new(Vec3::ZERO, 8.0));
		chunk.replace_mesh(some_mesh());
		chunk.deactivate();

		let coord = ChunkCoord::new(1, 0, 0);
		chunk.recycle(ChunkId(2), coord, ChunkBounds::new(Vec3::new(8.0, 0.0, 0.0), 8.0));
		assert_eq!(chunk.id(), ChunkId(2));
		assert_eq!(chunk.coord(), coord);
		assert!(chunk.is_active());
		assert!(chunk.mesh().is_empty());
		assert_eq!(chunk.corners()[0], Vec3::new(8.0, 0.0, 0.0));
		assert_eq!(chunk.outline().len(), 12);
	}
}
