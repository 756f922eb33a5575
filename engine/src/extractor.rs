use crate::error::EngineError;
use crate::marching_cubes::{triangle_count, MAX_TRIANGLES_PER_CELL};
use crate::scalar_field::ScalarField;
use crate::triangle::Triangle;
use rayon::prelude::*;

/// Marching cubes over a filled [`ScalarField`].
///
/// Every cell is polygonised independently on the rayon pool. Cells only read the shared
/// field, so the triangle order across cells is unspecified while each triangle keeps the
/// vertex order of the triangulation table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtractor {
	pub iso_level: f32,
}

impl SurfaceExtractor {
	pub fn new(iso_level: f32) -> Self {
		Self { iso_level }
	}

	/// Extracts into `out`, replacing its contents and reusing its allocation.
	/// Returns the number of triangles written.
	pub fn extract_into(
		&self,
		field: &ScalarField,
		out: &mut Vec<Triangle>,
	) -> Result<usize, EngineError> {
		out.clear();
		let cells = field.cell_count();

		// size the output exactly before writing anything
		let expected: usize = (0..cells)
			.into_par_iter()
			.map(|cell| triangle_count(field.cell_at(cell).cube_index(self.iso_level)))
			.sum();
		assert!(
			expected <= MAX_TRIANGLES_PER_CELL * cells,
			"{expected} triangles exceeds the bound for {cells} cells"
		);
		out.try_reserve(expected).map_err(EngineError::allocation("triangle buffer"))?;

		let iso_level = self.iso_level;
		out.par_extend(
			(0..cells).into_par_iter().flat_map_iter(|cell| field.cell_at(cell).polygonise(iso_level)),
		);
		assert_eq!(out.len(), expected, "extraction disagreed with the triangle count pass");

		Ok(out.len())
	}

	pub fn extract(&self, field: &ScalarField) -> Result<Vec<Triangle>, EngineError> {
		let mut out = Vec::new();
		self.extract_into(field, &mut out)?;
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bevy::prelude::*;
	use chunk::ChunkBounds;
	use density::{ConstantDensity, SphereDensity};

	#[test]
	fn test_uniform_field_has_no_surface() -> Result<(), EngineError> {
		let bounds = ChunkBounds::new(Vec3::splat(-16.0), 32.0);
		let field = ScalarField::fill(&bounds, 10, &ConstantDensity(1.0), 32.0 / 9.0)?;
		assert!(SurfaceExtractor::new(0.5).extract(&field)?.is_empty());

		let field = ScalarField::fill(&bounds, 10, &ConstantDensity(-3.0), 32.0 / 9.0)?;
		assert!(SurfaceExtractor::new(0.5).extract(&field)?.is_empty());
		Ok(())
	}

	#[test]
	fn test_sphere_surface_accuracy() -> Result<(), EngineError> {
		let bounds = ChunkBounds::new(Vec3::splat(-16.0), 32.0);
		let sphere = SphereDensity::new(bounds.centre(), 10.0);
		let field = ScalarField::fill(&bounds, 33, &sphere, 1.0)?;

		let triangles = SurfaceExtractor::new(0.0).extract(&field)?;
		assert!(!triangles.is_empty());
		for tri in &triangles {
			for vertex in tri.vertices() {
				let distance = vertex.distance(sphere.center);
				assert!((distance - 10.0).abs() < 0.05, "vertex at distance {distance}");
			}
			// faces point out of the sphere
			let [a, b, c] = tri.vertices();
			let normal = tri.area_normal();
			if normal.length() > 1e-4 {
				assert!(normal.dot((a + b + c) / 3.0 - sphere.center) > 0.0);
			}
		}
		Ok(())
	}

	#[test]
	fn test_output_buffer_is_reset_between_extractions() -> Result<(), EngineError> {
		let bounds = ChunkBounds::new(Vec3::ZERO, 4.0);
		let extractor = SurfaceExtractor::new(0.0);
		let mut out = Vec::new();

		let plane = ScalarField::fill(&bounds, 5, &|p: Vec3| p.y - 2.5, 1.0)?;
		let first = extractor.extract_into(&plane, &mut out)?;
		assert_eq!(first, 2 * 4 * 4);

		let empty = ScalarField::fill(&bounds, 5, &ConstantDensity(1.0), 1.0)?;
		assert_eq!(extractor.extract_into(&empty, &mut out)?, 0);
		assert!(out.is_empty());
		Ok(())
	}

	#[test]
	fn test_extraction_is_deterministic_up_to_order() -> Result<(), EngineError> {
		let bounds = ChunkBounds::new(Vec3::splat(-8.0), 16.0);
		let blob = |p: Vec3| (p * Vec3::new(1.0, 1.5, 0.7)).length() - 6.0 + (p.x * 0.9).sin();
		let field = ScalarField::fill(&bounds, 17, &blob, 1.0)?;
		let extractor = SurfaceExtractor::new(0.0);

		let mut first = extractor.extract(&field)?;
		let mut second = extractor.extract(&field)?;
		let key = |t: &Triangle| bytemuck::cast::<Triangle, [u32; 9]>(*t);
		first.sort_by_key(key);
		second.sort_by_key(key);
		assert_eq!(first, second);
		Ok(())
	}
}
