use bevy::prelude::*;
use bytemuck::{Pod, Zeroable};

/// One output triangle of the extractor, vertices in world space.
///
/// The vertex order is fixed by the triangulation table, so the winding of a triangle never
/// depends on how cells were scheduled.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Triangle {
	pub a: [f32; 3],
	pub b: [f32; 3],
	pub c: [f32; 3],
}

impl Triangle {
	pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
		Self { a: a.into(), b: b.into(), c: c.into() }
	}

	pub fn vertices(&self) -> [Vec3; 3] {
		[Vec3::from(self.a), Vec3::from(self.b), Vec3::from(self.c)]
	}

	/// Unnormalized face normal; its length is twice the triangle's area
	pub fn area_normal(&self) -> Vec3 {
		let [a, b, c] = self.vertices();
		(b - a).cross(c - a)
	}

	/// Unit face normal, or +Y for degenerate triangles
	pub fn normal(&self) -> Vec3 {
		self.area_normal().try_normalize().unwrap_or(Vec3::Y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_normal_follows_winding() {
		let tri = Triangle::new(Vec3::ZERO, Vec3::Z, Vec3::X);
		assert_eq!(tri.normal(), Vec3::Y);

		let flipped = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Z);
		assert_eq!(flipped.normal(), -Vec3::Y);
	}

	#[test]
	fn test_degenerate_normal_falls_back_to_up() {
		let tri = Triangle::new(Vec3::ONE, Vec3::ONE, Vec3::ONE);
		assert_eq!(tri.area_normal(), Vec3::ZERO);
		assert_eq!(tri.normal(), Vec3::Y);
	}

	#[test]
	fn test_triangle_is_plain_floats() {
		let tris = [Triangle::new(Vec3::X, Vec3::Y, Vec3::Z)];
		let floats: &[f32] = bytemuck::cast_slice(&tris);
		assert_eq!(floats, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
	}
}
