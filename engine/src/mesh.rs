use crate::error::EngineError;
use crate::triangle::Triangle;
use bevy::prelude::*;
use chunk::WorldConfig;
use std::collections::HashMap;

/// How triangles are assembled into a chunk mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshOptions {
	/// Merge co-located vertices and average the normals of the faces around them
	pub weld_vertices: bool,
	/// Keep a copy of the geometry for collision
	pub generate_collider: bool,
}

impl MeshOptions {
	/// Smooth terrain welds vertices unless flat shading is forced
	pub fn from_config(config: &WorldConfig) -> Self {
		Self {
			weld_vertices: config.smooth_terrain && !config.flat_shaded,
			generate_collider: config.generate_collider,
		}
	}
}

/// Geometry duplicated for a physics host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColliderMesh {
	pub positions: Vec<[f32; 3]>,
	pub indices: Vec<u32>,
}

/// Indexed triangle mesh of one chunk, in world space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
	pub positions: Vec<[f32; 3]>,
	pub normals: Vec<[f32; 3]>,
	/// Triangle list, three indices per triangle
	pub indices: Vec<u32>,
	pub collider: Option<ColliderMesh>,
}

impl ChunkMesh {
	pub fn from_triangles(triangles: &[Triangle], options: &MeshOptions) -> Result<Self, EngineError> {
		let mut mesh = if options.weld_vertices {
			Self::welded(triangles)?
		} else {
			Self::flat(triangles)?
		};

		if options.generate_collider {
			mesh.collider =
				Some(ColliderMesh { positions: mesh.positions.clone(), indices: mesh.indices.clone() });
		}

		Ok(mesh)
	}

	/// Every triangle owns its three vertices and carries its face normal
	fn flat(triangles: &[Triangle]) -> Result<Self, EngineError> {
		let vertex_count = triangles.len() * 3;
		let mut mesh = Self::with_capacity(vertex_count, vertex_count)?;

		for tri in triangles {
			let normal: [f32; 3] = tri.normal().into();
			for position in [tri.a, tri.b, tri.c] {
				mesh.indices.push(mesh.positions.len() as u32);
				mesh.positions.push(position);
				mesh.normals.push(normal);
			}
		}

		Ok(mesh)
	}

	/// Co-located vertices are merged, normals are the area weighted average of adjacent faces
	fn welded(triangles: &[Triangle]) -> Result<Self, EngineError> {
		let mut mesh = Self::with_capacity(0, triangles.len() * 3)?;
		let mut lookup: HashMap<[u32; 3], u32> = HashMap::new();
		let mut accumulated: Vec<Vec3> = Vec::new();

		for tri in triangles {
			let face = tri.area_normal();
			for position in [tri.a, tri.b, tri.c] {
				let index = *lookup.entry(position_key(position)).or_insert_with(|| {
					mesh.positions.push(position);
					accumulated.push(Vec3::ZERO);
					(mesh.positions.len() - 1) as u32
				});
				accumulated[index as usize] += face;
				mesh.indices.push(index);
			}
		}

		mesh.normals
			.try_reserve_exact(accumulated.len())
			.map_err(EngineError::allocation("mesh normals"))?;
		mesh.normals
			.extend(accumulated.into_iter().map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array()));

		Ok(mesh)
	}

	fn with_capacity(vertices: usize, indices: usize) -> Result<Self, EngineError> {
		let mut mesh = Self::default();
		mesh.positions.try_reserve_exact(vertices).map_err(EngineError::allocation("mesh positions"))?;
		mesh.normals.try_reserve_exact(vertices).map_err(EngineError::allocation("mesh normals"))?;
		mesh.indices.try_reserve_exact(indices).map_err(EngineError::allocation("mesh indices"))?;
		Ok(mesh)
	}

	pub fn vertex_count(&self) -> usize {
		self.positions.len()
	}

	pub fn triangle_count(&self) -> usize {
		self.indices.len() / 3
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	/// Drops the geometry but keeps the allocations
	pub fn clear(&mut self) {
		self.positions.clear();
		self.normals.clear();
		self.indices.clear();
		self.collider = None;
	}

	/// Positions as raw bytes for uploading to a vertex buffer
	pub fn position_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.positions)
	}

	pub fn index_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.indices)
	}

	pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
		self.indices
			.chunks_exact(3)
			.map(|tri| [0, 1, 2].map(|corner| Vec3::from(self.positions[tri[corner] as usize])))
	}
}

/// Bitwise key of a position, with -0.0 folded into 0.0
fn position_key(position: [f32; 3]) -> [u32; 3] {
	position.map(|v| (v + 0.0).to_bits())
}
