use crate::triangle::Triangle;
use std::ops::{Deref, DerefMut};

/// What happens to scratch buffers when a remesh scope ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
	/// Release the buffers as soon as the scope ends
	#[default]
	OneShot,
	/// Keep the buffers in the pool for the next scope
	Batch,
}

/// Working memory of one remesh: the sample grid and the triangle accumulation buffer
#[derive(Debug, Default)]
pub struct ScratchBuffers {
	pub samples: Vec<f32>,
	pub triangles: Vec<Triangle>,
}

impl ScratchBuffers {
	/// Logically empties both buffers. Capacity is kept.
	pub fn reset(&mut self) {
		self.samples.clear();
		self.triangles.clear();
	}

	pub fn capacity_bytes(&self) -> usize {
		self.samples.capacity() * size_of::<f32>()
			+ self.triangles.capacity() * size_of::<Triangle>()
	}
}

/// Owner of the scratch buffers between remesh scopes
#[derive(Debug, Default)]
pub struct ScratchPool {
	parked: Option<ScratchBuffers>,
}

impl ScratchPool {
	/// Takes the buffers for one scope. The guard borrows the pool mutably, so two scopes can
	/// never hold the same buffers.
	pub fn acquire(&mut self, mode: BufferMode) -> ScratchGuard<'_> {
		let mut buffers = self.parked.take().unwrap_or_default();
		buffers.reset();
		ScratchGuard { pool: self, buffers, mode }
	}

	/// True when buffers from a previous batch are being kept
	pub fn is_retained(&self) -> bool {
		self.parked.is_some()
	}

	pub fn retained_bytes(&self) -> usize {
		self.parked.as_ref().map_or(0, ScratchBuffers::capacity_bytes)
	}

	/// Frees any retained buffers
	pub fn release(&mut self) {
		if let Some(buffers) = self.parked.take() {
			log::debug!("Releasing {} bytes of scratch buffers", buffers.capacity_bytes());
		}
	}
}

/// Scoped access to the pool's buffers
pub struct ScratchGuard<'a> {
	pool: &'a mut ScratchPool,
	buffers: ScratchBuffers,
	mode: BufferMode,
}

impl Deref for ScratchGuard<'_> {
	type Target = ScratchBuffers;

	fn deref(&self) -> &ScratchBuffers {
		&self.buffers
	}
}

impl DerefMut for ScratchGuard<'_> {
	fn deref_mut(&mut self) -> &mut ScratchBuffers {
		&mut self.buffers
	}
}

impl Drop for ScratchGuard<'_> {
	fn drop(&mut self) {
		match self.mode {
			BufferMode::Batch => {
				let mut buffers = std::mem::take(&mut self.buffers);
				buffers.reset();
				self.pool.parked = Some(buffers);
			}
			BufferMode::OneShot => {
				log::debug!(
					"Dropping {} bytes of one-shot scratch buffers",
					self.buffers.capacity_bytes()
				);
			}
		}
	}
}
