use crate::chunk::Chunk;
use crate::error::EngineError;
use crate::extractor::SurfaceExtractor;
use crate::mesh::{ChunkMesh, MeshOptions};
use crate::scalar_field::ScalarField;
use crate::scratch::ScratchBuffers;
use chunk::{ChunkCoord, WorldConfig};
use density::DensitySource;
use std::time::{Duration, Instant};

/// Outcome of one successful chunk remesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshStats {
	pub coord: ChunkCoord,
	pub triangles: usize,
	pub vertices: usize,
	pub elapsed: Duration,
}

/// Sample, extract and assemble, for chunks of one configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPipeline {
	pub resolution: usize,
	pub spacing: f32,
	pub extractor: SurfaceExtractor,
	pub options: MeshOptions,
}

impl MeshPipeline {
	pub fn from_config(config: &WorldConfig) -> Result<Self, EngineError> {
		config.validate()?;
		Ok(Self {
			resolution: config.resolution,
			spacing: config.spacing(),
			extractor: SurfaceExtractor::new(config.iso_level),
			options: MeshOptions::from_config(config),
		})
	}

	/// Rebuilds the chunk's mesh from `density`.
	///
	/// The chunk's mesh is only replaced once every stage has succeeded. On error it keeps its
	/// previous mesh.
	pub fn remesh<S>(
		&self,
		chunk: &mut Chunk,
		density: &S,
		scratch: &mut ScratchBuffers,
	) -> Result<MeshStats, EngineError>
	where
		S: DensitySource + ?Sized,
	{
		let start = Instant::now();
		scratch.reset();

		let samples = std::mem::take(&mut scratch.samples);
		let field =
			ScalarField::fill_with(samples, chunk.bounds(), self.resolution, density, self.spacing)?;
		let sampled = start.elapsed();

		let extracted = self.extractor.extract_into(&field, &mut scratch.triangles);
		scratch.samples = field.into_samples();
		let triangles = extracted?;
		let extraction = start.elapsed() - sampled;

		let mesh = ChunkMesh::from_triangles(&scratch.triangles, &self.options)?;
		let vertices = mesh.vertex_count();
		chunk.replace_mesh(mesh);

		let elapsed = start.elapsed();
		log::debug!(
			"Remeshed chunk {} at {}: {} triangles (sampling {:?}, extraction {:?}, total {:?})",
			chunk.id(),
			chunk.coord(),
			triangles,
			sampled,
			extraction,
			elapsed
		);

		Ok(MeshStats { coord: chunk.coord(), triangles, vertices, elapsed })
	}
}
