use bevy::prelude::*;
use chunk::{ChunkCoord, ConfigError};
use std::collections::TryReserveError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("invalid world configuration: {0}")]
	Configuration(#[from] ConfigError),
	#[error("failed to allocate {what}: {source}")]
	Allocation {
		what: &'static str,
		#[source]
		source: TryReserveError,
	},
	#[error("no live chunk at {0}")]
	UnknownChunk(ChunkCoord),
	#[error("density source returned a non-finite value at {position}")]
	InvalidSample { position: Vec3 },
}

impl EngineError {
	pub(crate) fn allocation(what: &'static str) -> impl FnOnce(TryReserveError) -> Self {
		move |source| EngineError::Allocation { what, source }
	}
}
