use crate::DensitySource;
use bevy::prelude::*;

/// The same value everywhere. Produces no surface unless it equals the iso-level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDensity(pub f32);

impl DensitySource for ConstantDensity {
	fn sample(&self, _p: Vec3) -> f32 {
		self.0
	}
}
