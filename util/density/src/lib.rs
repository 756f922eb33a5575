pub mod constant;
pub mod field;
pub mod perlin;
pub mod sphere;

pub use constant::ConstantDensity;
pub use field::Density;
pub use perlin::{NoiseDensity, NoiseShape};
pub use sphere::SphereDensity;

use bevy::prelude::*;

/// A scalar density field sampled at world positions.
///
/// Values below the iso-level are inside the surface, values at or above it are outside.
/// Implementations are sampled from many threads at once and must be pure.
pub trait DensitySource: Send + Sync {
	fn sample(&self, p: Vec3) -> f32;
}

impl<F> DensitySource for F
where
	F: Fn(Vec3) -> f32 + Send + Sync,
{
	fn sample(&self, p: Vec3) -> f32 {
		self(p)
	}
}
