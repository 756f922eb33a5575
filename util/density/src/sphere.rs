use crate::DensitySource;
use bevy::prelude::*;

/// Signed distance to a sphere, negative inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereDensity {
	pub center: Vec3,
	pub radius: f32,
}

impl SphereDensity {
	pub fn new(center: Vec3, radius: f32) -> Self {
		Self { center, radius }
	}
}

impl DensitySource for SphereDensity {
	fn sample(&self, p: Vec3) -> f32 {
		(p - self.center).length() - self.radius
	}
}
