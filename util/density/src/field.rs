use crate::{ConstantDensity, DensitySource, NoiseDensity, NoiseShape, SphereDensity};
use bevy::prelude::*;
use chunk::{WorldConfig, WorldType};
use std::fmt;
use std::sync::Arc;

/// The density function a world samples, chosen from its topology
#[derive(Clone)]
pub enum Density {
	Noise(NoiseDensity),
	Sphere(SphereDensity),
	Constant(ConstantDensity),
	Custom(Arc<dyn DensitySource>),
}

impl Density {
	/// Density for the world described by `config`.
	///
	/// Spherical worlds are a sphere of radius `terrain_height` at the origin, cavernous worlds
	/// use 3D noise and every other topology uses noise terrain.
	pub fn for_world(config: &WorldConfig) -> Self {
		let density = match config.world_type {
			WorldType::Spherical => {
				Density::Sphere(SphereDensity::new(Vec3::ZERO, config.terrain_height))
			}
			WorldType::Cavernous => {
				Density::Noise(NoiseDensity::from_config(config, NoiseShape::Caverns))
			}
			WorldType::Infinite | WorldType::Finite => {
				Density::Noise(NoiseDensity::from_config(config, NoiseShape::Terrain))
			}
		};
		log::debug!("Selected {:?} density for {:?} world", density, config.world_type);
		density
	}

	pub fn custom(source: impl DensitySource + 'static) -> Self {
		Density::Custom(Arc::new(source))
	}
}

impl DensitySource for Density {
	fn sample(&self, p: Vec3) -> f32 {
		match self {
			Density::Noise(noise) => noise.sample(p),
			Density::Sphere(sphere) => sphere.sample(p),
			Density::Constant(constant) => constant.sample(p),
			Density::Custom(source) => source.sample(p),
		}
	}
}

impl fmt::Debug for Density {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Density::Noise(noise) => write!(f, "Noise({:?}, seed {})", noise.shape, noise.seed()),
			Density::Sphere(sphere) => {
				write!(f, "Sphere(center {}, radius {})", sphere.center, sphere.radius)
			}
			Density::Constant(constant) => write!(f, "Constant({})", constant.0),
			Density::Custom(_) => f.write_str("Custom"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_world_type_selects_density() {
		let mut config = WorldConfig::default();

		config.world_type = WorldType::Spherical;
		match Density::for_world(&config) {
			Density::Sphere(sphere) => {
				assert_eq!(sphere.center, Vec3::ZERO);
				assert_eq!(sphere.radius, config.terrain_height);
			}
			other => panic!("expected a sphere, got {:?}", other),
		}

		config.world_type = WorldType::Cavernous;
		assert!(matches!(
			Density::for_world(&config),
			Density::Noise(NoiseDensity { shape: NoiseShape::Caverns, .. })
		));

		for world_type in [WorldType::Infinite, WorldType::Finite] {
			config.world_type = world_type;
			assert!(matches!(
				Density::for_world(&config),
				Density::Noise(NoiseDensity { shape: NoiseShape::Terrain, .. })
			));
		}
	}

	#[test]
	fn test_custom_density_dispatch() {
		let density = Density::custom(|p: Vec3| p.x);
		assert_eq!(density.sample(Vec3::new(3.0, 1.0, 1.0)), 3.0);
		assert_eq!(format!("{:?}", density), "Custom");

		let constant = Density::Constant(ConstantDensity(-1.5));
		assert_eq!(constant.sample(Vec3::splat(100.0)), -1.5);
	}
}
