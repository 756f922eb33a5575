use crate::error::EngineError;
use crate::marching_cubes::{Cell, CORNER_OFFSETS};
use bevy::prelude::*;
use chunk::{ChunkBounds, ConfigError, MAX_RESOLUTION, MIN_RESOLUTION};
use density::DensitySource;
use rayon::prelude::*;

/// Regular grid of density samples covering one chunk.
///
/// Samples are stored at `i + resolution * j + resolution² * k`.
#[derive(Debug, Clone)]
pub struct ScalarField {
	samples: Vec<f32>,
	resolution: usize,
	origin: Vec3,
	spacing: f32,
}

impl ScalarField {
	pub fn fill<S>(
		bounds: &ChunkBounds,
		resolution: usize,
		source: &S,
		spacing: f32,
	) -> Result<Self, EngineError>
	where
		S: DensitySource + ?Sized,
	{
		Self::fill_with(Vec::new(), bounds, resolution, source, spacing)
	}

	/// Fills the field into `samples`, reusing its allocation.
	///
	/// Arguments are validated before anything is allocated.
	pub fn fill_with<S>(
		mut samples: Vec<f32>,
		bounds: &ChunkBounds,
		resolution: usize,
		source: &S,
		spacing: f32,
	) -> Result<Self, EngineError>
	where
		S: DensitySource + ?Sized,
	{
		if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
			return Err(ConfigError::ResolutionOutOfRange { resolution }.into());
		}
		if !bounds.edge.is_finite() || bounds.edge <= 0.0 {
			return Err(ConfigError::InvalidEdgeLength(bounds.edge).into());
		}
		if !spacing.is_finite() || spacing <= 0.0 {
			return Err(ConfigError::InvalidSpacing(spacing).into());
		}

		let len = resolution * resolution * resolution;
		samples.clear();
		samples.try_reserve(len).map_err(EngineError::allocation("scalar field samples"))?;
		samples.resize(len, 0.0);

		let origin = bounds.min;
		let plane = resolution * resolution;
		samples.par_chunks_mut(plane).enumerate().for_each(|(k, slice)| {
			for j in 0..resolution {
				for i in 0..resolution {
					let offset = Vec3::new(i as f32, j as f32, k as f32) * spacing;
					slice[i + resolution * j] = source.sample(origin + offset);
				}
			}
		});

		let field = Self { samples, resolution, origin, spacing };
		if let Some(index) = field.samples.par_iter().position_any(|v| !v.is_finite()) {
			let (i, j, k) = field.grid_index(index);
			return Err(EngineError::InvalidSample { position: field.position(i, j, k) });
		}

		Ok(field)
	}

	pub fn resolution(&self) -> usize {
		self.resolution
	}

	pub fn spacing(&self) -> f32 {
		self.spacing
	}

	pub fn origin(&self) -> Vec3 {
		self.origin
	}

	pub fn samples(&self) -> &[f32] {
		&self.samples
	}

	/// Hands the sample buffer back for reuse
	pub fn into_samples(self) -> Vec<f32> {
		self.samples
	}

	pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
		i + self.resolution * j + self.resolution * self.resolution * k
	}

	pub fn grid_index(&self, index: usize) -> (usize, usize, usize) {
		let r = self.resolution;
		(index % r, (index / r) % r, index / (r * r))
	}

	pub fn value(&self, i: usize, j: usize, k: usize) -> f32 {
		self.samples[self.index(i, j, k)]
	}

	pub fn position(&self, i: usize, j: usize, k: usize) -> Vec3 {
		self.origin + Vec3::new(i as f32, j as f32, k as f32) * self.spacing
	}

	/// Cells per axis
	pub fn cells_per_axis(&self) -> usize {
		self.resolution - 1
	}

	pub fn cell_count(&self) -> usize {
		self.cells_per_axis().pow(3)
	}

	/// The cube whose lowest corner is sample (i, j, k)
	pub fn cell(&self, i: usize, j: usize, k: usize) -> Cell {
		let positions = CORNER_OFFSETS
			.map(|[x, y, z]| self.position(i + x as usize, j + y as usize, k + z as usize));
		let values = CORNER_OFFSETS
			.map(|[x, y, z]| self.value(i + x as usize, j + y as usize, k + z as usize));
		Cell { positions, values }
	}

	/// The cell with linear cell index `cell`, x fastest
	pub fn cell_at(&self, cell: usize) -> Cell {
		let n = self.cells_per_axis();
		self.cell(cell % n, (cell / n) % n, cell / (n * n))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_linear_addressing() -> Result<(), EngineError> {
		let bounds = ChunkBounds::new(Vec3::new(10.0, 20.0, 30.0), 3.0);
		// encode the sample position into the density so every sample is unique
		let source = |p: Vec3| p.x + 100.0 * p.y + 10_000.0 * p.z;
		let field = ScalarField::fill(&bounds, 4, &source, 1.0)?;

		assert_eq!(field.samples().len(), 64);
		for k in 0..4 {
			for j in 0..4 {
				for i in 0..4 {
					let p = field.position(i, j, k);
					assert_eq!(field.samples()[i + 4 * j + 16 * k], source(p));
					assert_eq!(field.grid_index(field.index(i, j, k)), (i, j, k));
				}
			}
		}
		assert_eq!(field.position(3, 3, 3), bounds.max());
		Ok(())
	}

	#[test]
	fn test_cell_corners_follow_corner_order() -> Result<(), EngineError> {
		let bounds = ChunkBounds::new(Vec3::ZERO, 2.0);
		let field = ScalarField::fill(&bounds, 3, &|p: Vec3| p.length(), 1.0)?;
		assert_eq!(field.cell_count(), 8);

		let cell = field.cell_at(7);
		assert_eq!(cell.positions[0], Vec3::ONE);
		assert_eq!(cell.positions[6], Vec3::splat(2.0));
		assert_eq!(cell.positions[2], Vec3::new(2.0, 1.0, 2.0));
		for (position, value) in cell.positions.iter().zip(cell.values) {
			assert_eq!(position.length(), value);
		}
		Ok(())
	}

	#[test]
	fn test_degenerate_arguments_are_rejected() {
		let bounds = ChunkBounds::new(Vec3::ZERO, 32.0);
		let source = |_: Vec3| 1.0;

		assert!(matches!(
			ScalarField::fill(&bounds, 1, &source, 32.0),
			Err(EngineError::Configuration(ConfigError::ResolutionOutOfRange { resolution: 1 }))
		));

		let flat = ChunkBounds::new(Vec3::ZERO, 0.0);
		assert!(matches!(
			ScalarField::fill(&flat, 10, &source, 1.0),
			Err(EngineError::Configuration(ConfigError::InvalidEdgeLength(_)))
		));

		assert!(matches!(
			ScalarField::fill(&bounds, 10, &source, 0.0),
			Err(EngineError::Configuration(ConfigError::InvalidSpacing(_)))
		));
	}

	#[test]
	fn test_validation_runs_before_sampling() {
		let bounds = ChunkBounds::new(Vec3::ZERO, 32.0);
		let source = |_: Vec3| -> f32 { panic!("a rejected field must not be sampled") };
		assert!(ScalarField::fill(&bounds, 101, &source, 1.0).is_err());
	}

	#[test]
	fn test_non_finite_samples_are_reported() {
		let bounds = ChunkBounds::new(Vec3::ZERO, 4.0);
		let source = |p: Vec3| if p.x > 3.0 && p.y > 3.0 && p.z > 3.0 { f32::NAN } else { 0.0 };
		match ScalarField::fill(&bounds, 5, &source, 1.0) {
			Err(EngineError::InvalidSample { position }) => assert_eq!(position, Vec3::splat(4.0)),
			other => panic!("expected an invalid sample, got {:?}", other.map(|f| f.resolution())),
		}
	}

	#[test]
	fn test_buffer_is_reused() -> Result<(), EngineError> {
		let bounds = ChunkBounds::new(Vec3::ZERO, 8.0);
		let first = ScalarField::fill(&bounds, 9, &|p: Vec3| p.y, 1.0)?;
		let buffer = first.into_samples();
		let capacity = buffer.capacity();
		let ptr = buffer.as_ptr();

		let second = ScalarField::fill_with(buffer, &bounds, 5, &|p: Vec3| -p.y, 2.0)?;
		assert_eq!(second.samples().len(), 125);
		assert_eq!(second.samples().as_ptr(), ptr);
		assert!(capacity >= 125);
		assert_eq!(second.value(0, 4, 0), -8.0);
		Ok(())
	}
}
