use crate::chunk::{Chunk, ChunkId};
use crate::error::EngineError;
use crate::pipeline::{MeshPipeline, MeshStats};
use crate::scratch::{BufferMode, ScratchPool};
use bevy::prelude::*;
use chunk::{ChunkBounds, ChunkCoord, ChunkSize, ConfigError, WorldConfig, WorldType};
use density::Density;
use std::collections::{HashMap, HashSet};

/// Coordinates touched by one [`ChunkManager::reconcile`] pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
	pub created: Vec<ChunkCoord>,
	pub kept: Vec<ChunkCoord>,
	pub removed: Vec<ChunkCoord>,
}

/// Result of remeshing a set of chunks. A failed chunk does not stop the others.
#[derive(Debug, Default)]
pub struct RemeshReport {
	pub remeshed: Vec<MeshStats>,
	pub failed: Vec<(ChunkCoord, EngineError)>,
}

impl RemeshReport {
	pub fn merge(&mut self, other: RemeshReport) {
		self.remeshed.extend(other.remeshed);
		self.failed.extend(other.failed);
	}

	pub fn triangles(&self) -> usize {
		self.remeshed.iter().map(|stats| stats.triangles).sum()
	}

	pub fn is_clean(&self) -> bool {
		self.failed.is_empty()
	}
}

/// Owns the live chunks of a world and keeps their meshes current.
///
/// Chunks are stored densely; `lookup` maps each live coordinate to its slot.
#[derive(Resource)]
pub struct ChunkManager {
	config: WorldConfig,
	density: Density,
	chunks: Vec<Chunk>,
	lookup: HashMap<ChunkCoord, usize>,
	/// Deactivated chunks kept for reuse while running
	recycled: Vec<Chunk>,
	scratch: ScratchPool,
	running: bool,
	settings_updated: bool,
	next_id: u64,
}

impl ChunkManager {
	/// A manager sampling the density that belongs to the configured world type
	pub fn new(config: WorldConfig) -> Result<Self, EngineError> {
		let density = Density::for_world(&config);
		Self::with_density(config, density)
	}

	pub fn with_density(config: WorldConfig, density: Density) -> Result<Self, EngineError> {
		config.validate()?;
		Ok(Self {
			config,
			density,
			chunks: Vec::new(),
			lookup: HashMap::new(),
			recycled: Vec::new(),
			scratch: ScratchPool::default(),
			running: false,
			settings_updated: false,
			next_id: 0,
		})
	}

	pub fn config(&self) -> &WorldConfig {
		&self.config
	}

	pub fn density(&self) -> &Density {
		&self.density
	}

	pub fn chunks(&self) -> &[Chunk] {
		&self.chunks
	}

	pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
		self.lookup.get(&coord).map(|index| &self.chunks[*index])
	}

	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}

	pub fn recycled_len(&self) -> usize {
		self.recycled.len()
	}

	pub fn scratch(&self) -> &ScratchPool {
		&self.scratch
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn settings_updated(&self) -> bool {
		self.settings_updated
	}

	/// Switches between running and idle.
	///
	/// While running, removed chunks are parked for reuse and scratch buffers persist across
	/// batches. Going idle frees both.
	pub fn set_running(&mut self, running: bool) {
		if self.running == running {
			return;
		}
		self.running = running;
		if !running {
			self.recycled.clear();
			self.scratch.release();
		}
		log::info!("Chunk manager is now {}", self.state_name());
	}

	fn state_name(&self) -> &'static str {
		if self.running {
			"running"
		} else {
			"idle"
		}
	}

	fn buffer_mode(&self) -> BufferMode {
		if self.running {
			BufferMode::Batch
		} else {
			BufferMode::OneShot
		}
	}

	/// Replaces the configuration. Chunk bounds follow the new layout and a remesh is requested.
	///
	/// A custom density is kept, every other density is rebuilt for the new world.
	pub fn set_config(&mut self, config: WorldConfig) -> Result<(), EngineError> {
		config.validate()?;
		self.config = config;
		if !matches!(self.density, Density::Custom(_)) {
			self.density = Density::for_world(&self.config);
		}
		self.refresh_chunks();
		self.mark_settings_updated();
		Ok(())
	}

	/// Rebinds the density source for a new world type
	pub fn set_world_type(&mut self, world_type: WorldType) {
		log::info!("Switching world type from {:?} to {:?}", self.config.world_type, world_type);
		self.config.world_type = world_type;
		self.density = Density::for_world(&self.config);
		self.refresh_chunks();
		self.mark_settings_updated();
	}

	pub fn set_chunk_size(&mut self, chunk_size: ChunkSize) {
		self.config.set_chunk_size(chunk_size);
		self.refresh_chunks();
		self.mark_settings_updated();
	}

	/// Picks a new seed and rebuilds the density from it
	pub fn randomize_seed(&mut self) -> u32 {
		let seed = self.config.randomize_seed();
		if !matches!(self.density, Density::Custom(_)) {
			self.density = Density::for_world(&self.config);
		}
		self.mark_settings_updated();
		seed
	}

	fn refresh_chunks(&mut self) {
		for chunk in self.chunks.iter_mut() {
			chunk.set_bounds(ChunkBounds::for_coord(chunk.coord(), &self.config));
			chunk.draw_outline = self.config.draw_chunk_outline;
		}
	}

	pub fn mark_settings_updated(&mut self) {
		self.settings_updated = true;
	}

	pub fn required_coords(&self, viewer: Vec3) -> Result<Vec<ChunkCoord>, ConfigError> {
		chunk::required_coords(&self.config, viewer)
	}

	/// Brings the live set in line with `required`.
	///
	/// Chunks that stay required keep their identity and mesh. Chunks no longer required are
	/// parked for reuse while running and dropped otherwise.
	pub fn reconcile(&mut self, required: &[ChunkCoord]) -> ReconcileReport {
		let required_set: HashSet<ChunkCoord> = required.iter().copied().collect();
		let mut report = ReconcileReport::default();

		let mut index = 0;
		while index < self.chunks.len() {
			let coord = self.chunks[index].coord();
			if required_set.contains(&coord) {
				index += 1;
				continue;
			}

			let chunk = self.chunks.swap_remove(index);
			self.lookup.remove(&coord);
			if let Some(moved) = self.chunks.get(index) {
				self.lookup.insert(moved.coord(), index);
			}
			self.retire(chunk);
			report.removed.push(coord);
		}

		let mut seen = HashSet::with_capacity(required.len());
		for &coord in required {
			if !seen.insert(coord) {
				continue;
			}
			if let Some(&index) = self.lookup.get(&coord) {
				let bounds = ChunkBounds::for_coord(coord, &self.config);
				self.chunks[index].set_bounds(bounds);
				report.kept.push(coord);
			} else {
				let chunk = self.create(coord);
				self.lookup.insert(coord, self.chunks.len());
				self.chunks.push(chunk);
				report.created.push(coord);
			}
		}

		log::debug!(
			"Reconciled chunks: {} created, {} kept, {} removed",
			report.created.len(),
			report.kept.len(),
			report.removed.len()
		);
		report
	}

	fn create(&mut self, coord: ChunkCoord) -> Chunk {
		let id = ChunkId(self.next_id);
		self.next_id += 1;
		let bounds = ChunkBounds::for_coord(coord, &self.config);

		let mut chunk = match self.recycled.pop() {
			Some(mut chunk) => {
				chunk.recycle(id, coord, bounds);
				chunk
			}
			None => Chunk::new(id, coord, bounds),
		};
		chunk.draw_outline = self.config.draw_chunk_outline;
		chunk
	}

	fn retire(&mut self, mut chunk: Chunk) {
		if self.running {
			chunk.deactivate();
			self.recycled.push(chunk);
		} else {
			log::debug!("Destroying chunk {} at {}", chunk.id(), chunk.coord());
		}
	}

	/// Remeshes every live chunk
	pub fn remesh_all(&mut self) -> Result<RemeshReport, EngineError> {
		let indices: Vec<usize> = (0..self.chunks.len()).collect();
		let report = self.remesh_indices(&indices)?;
		self.settings_updated = false;
		Ok(report)
	}

	/// Remeshes the listed chunks, skipping coordinates that are not live
	pub fn remesh_coords(&mut self, coords: &[ChunkCoord]) -> Result<RemeshReport, EngineError> {
		let indices: Vec<usize> =
			coords.iter().filter_map(|coord| self.lookup.get(coord).copied()).collect();
		self.remesh_indices(&indices)
	}

	pub fn remesh_one(&mut self, coord: ChunkCoord) -> Result<MeshStats, EngineError> {
		let index = *self.lookup.get(&coord).ok_or(EngineError::UnknownChunk(coord))?;
		let pipeline = MeshPipeline::from_config(&self.config)?;
		let mode = self.buffer_mode();
		let mut scratch = self.scratch.acquire(mode);
		pipeline.remesh(&mut self.chunks[index], &self.density, &mut scratch)
	}

	fn remesh_indices(&mut self, indices: &[usize]) -> Result<RemeshReport, EngineError> {
		let pipeline = MeshPipeline::from_config(&self.config)?;
		let mode = self.buffer_mode();
		let mut scratch = self.scratch.acquire(mode);
		let mut report = RemeshReport::default();

		for &index in indices {
			let Some(chunk) = self.chunks.get_mut(index) else {
				continue;
			};
			match pipeline.remesh(chunk, &self.density, &mut scratch) {
				Ok(stats) => report.remeshed.push(stats),
				Err(e) => {
					log::warn!("Failed to remesh chunk at {}: {}", chunk.coord(), e);
					report.failed.push((chunk.coord(), e));
				}
			}
		}

		let level = if indices.is_empty() { log::Level::Debug } else { log::Level::Info };
		log::log!(
			level,
			"Remeshed {} chunks ({} triangles), {} failed",
			report.remeshed.len(),
			report.triangles(),
			report.failed.len()
		);
		Ok(report)
	}

	/// Builds the world around `viewer`.
	///
	/// Finite worlds reconcile the whole lattice and remesh every chunk. Streaming worlds
	/// reconcile the visible set and only mesh chunks that were just created.
	pub fn run(&mut self, viewer: Vec3) -> Result<RemeshReport, EngineError> {
		let required = self.required_coords(viewer)?;
		let reconciled = self.reconcile(&required);

		if self.config.world_type.is_streaming() {
			self.remesh_coords(&reconciled.created)
		} else {
			self.remesh_all()
		}
	}

	/// Regenerates every chunk after a settings change, if auto update is enabled for the
	/// current run state
	pub fn request_remesh(&mut self, viewer: Vec3) -> Result<Option<RemeshReport>, EngineError> {
		if !self.config.auto_update(self.running) {
			log::debug!("Auto update disabled while {}, skipping remesh request", self.state_name());
			return Ok(None);
		}
		let required = self.required_coords(viewer)?;
		self.reconcile(&required);
		self.remesh_all().map(Some)
	}

	/// Per-frame tick: applies a pending settings change, otherwise streams chunks around the
	/// viewer while running.
	///
	/// An applied settings change already reconciles against the viewer, so each chunk is meshed
	/// at most once per tick.
	pub fn update(&mut self, viewer: Vec3) -> Result<RemeshReport, EngineError> {
		if self.settings_updated {
			self.settings_updated = false;
			if let Some(report) = self.request_remesh(viewer)? {
				return Ok(report);
			}
		}

		if self.running && self.config.world_type.is_streaming() {
			return self.run(viewer);
		}

		Ok(RemeshReport::default())
	}

	/// Outline segments of every active chunk that wants its outline drawn
	pub fn chunk_outlines(&self) -> impl Iterator<Item = (ChunkCoord, [(Vec3, Vec3); 12])> + '_ {
		self.chunks
			.iter()
			.filter(|chunk| chunk.is_active() && chunk.draw_outline)
			.map(|chunk| (chunk.coord(), chunk.outline()))
	}
}
