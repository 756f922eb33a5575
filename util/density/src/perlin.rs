use crate::DensitySource;
use bevy::prelude::*;
use chunk::WorldConfig;
use noise::{NoiseFn, Perlin, Seedable};

/// How the noise value is turned into a density
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseShape {
	/// A heightfield around `terrain_height`, noise pushes the ground up
	Terrain,
	/// Fully 3D, solid wherever the noise rises above the threshold
	Caverns,
}

/// Ridged multi-octave Perlin density
#[derive(Debug, Clone)]
pub struct NoiseDensity {
	perlin: Perlin,
	pub shape: NoiseShape,
	pub offset: Vec3,
	pub terrain_height: f32,
	pub threshold: f32,
	pub weight: f32,
	pub octaves: u32,
	pub frequency: f32,
	pub lacunarity: f32,
	pub persistence: f32,
	/// Scales how strongly one octave's ridges gate the next
	pub weight_multiplier: f32,
}

impl NoiseDensity {
	pub fn new(seed: u32, shape: NoiseShape) -> Self {
		Self {
			perlin: Perlin::new(seed),
			shape,
			offset: Vec3::ZERO,
			terrain_height: 8.0,
			threshold: 0.6,
			weight: 4.0,
			octaves: 6,
			frequency: 0.02,
			lacunarity: 2.0,
			persistence: 0.5,
			weight_multiplier: 1.2,
		}
	}

	pub fn from_config(config: &WorldConfig, shape: NoiseShape) -> Self {
		Self {
			terrain_height: config.terrain_height,
			threshold: config.noise_threshold,
			weight: config.noise_weight,
			..Self::new(config.seed, shape)
		}
	}

	pub fn seed(&self) -> u32 {
		self.perlin.seed()
	}

	/// Sum of ridged octaves at `p`, always non-negative
	pub fn noise_at(&self, p: Vec3) -> f32 {
		let mut total = 0.0;
		let mut amplitude = 1.0;
		let mut frequency = self.frequency;
		let mut ridge_weight = 1.0;

		for _ in 0..self.octaves {
			let q = (p + self.offset) * frequency;
			let n = self.perlin.get([q.x as f64, q.y as f64, q.z as f64]) as f32;

			let ridge = 1.0 - n.abs();
			let v = ridge * ridge * ridge_weight;
			ridge_weight = (v * self.weight_multiplier).clamp(0.0, 1.0);

			total += v * amplitude;
			amplitude *= self.persistence;
			frequency *= self.lacunarity;
		}

		total
	}
}

impl DensitySource for NoiseDensity {
	fn sample(&self, p: Vec3) -> f32 {
		let n = self.noise_at(p);
		match self.shape {
			NoiseShape::Terrain => p.y - self.terrain_height - (n - self.threshold) * self.weight,
			NoiseShape::Caverns => (self.threshold - n) * self.weight,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_same_seed_same_field() {
		let a = NoiseDensity::new(42, NoiseShape::Terrain);
		let b = NoiseDensity::new(42, NoiseShape::Terrain);
		for i in 0..32 {
			let p = Vec3::new(i as f32 * 3.7, i as f32 * -1.3, i as f32 * 0.9);
			assert_eq!(a.sample(p), b.sample(p));
		}
		assert_eq!(a.seed(), 42);
	}

	#[test]
	fn test_terrain_is_solid_below_and_empty_above() {
		let terrain = NoiseDensity::new(7, NoiseShape::Terrain);
		// ridged octaves sum to less than 2 with the default persistence
		let swing = 2.0 * terrain.weight;
		for x in [-50.0, 0.0, 13.0, 200.0] {
			let low = Vec3::new(x, terrain.terrain_height - swing - 1.0, x * 0.5);
			let high = Vec3::new(x, terrain.terrain_height + swing + 1.0, x * 0.5);
			assert!(terrain.sample(low) < 0.0);
			assert!(terrain.sample(high) > 0.0);
		}
	}

	#[test]
	fn test_noise_is_finite_and_non_negative() {
		let caverns = NoiseDensity::new(651615, NoiseShape::Caverns);
		for i in 0..64 {
			let p = Vec3::new(i as f32 * 11.3, i as f32 * 7.1, i as f32 * -5.7);
			let n = caverns.noise_at(p);
			assert!(n.is_finite());
			assert!(n >= 0.0);
			assert!(caverns.sample(p).is_finite());
		}
	}

	#[test]
	fn test_from_config_takes_world_parameters() {
		let config = WorldConfig { seed: 99, terrain_height: 20.0, noise_weight: 2.0, ..Default::default() };
		let density = NoiseDensity::from_config(&config, NoiseShape::Terrain);
		assert_eq!(density.seed(), 99);
		assert_eq!(density.terrain_height, 20.0);
		assert_eq!(density.weight, 2.0);
	}
}
