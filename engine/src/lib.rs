pub mod chunk;
pub mod chunk_manager;
pub mod error;
pub mod extractor;
pub mod marching_cubes;
pub mod mesh;
pub mod pipeline;
pub mod scalar_field;
pub mod scratch;
pub mod triangle;

pub use self::chunk::{Chunk, ChunkId};
pub use chunk_manager::{ChunkManager, ReconcileReport, RemeshReport};
pub use error::EngineError;
pub use extractor::SurfaceExtractor;
pub use mesh::{ChunkMesh, ColliderMesh, MeshOptions};
pub use pipeline::{MeshPipeline, MeshStats};
pub use scalar_field::ScalarField;
pub use scratch::{BufferMode, ScratchBuffers, ScratchGuard, ScratchPool};
pub use triangle::Triangle;

// Hosts drive the engine through a ChunkManager:
// - build it from a WorldConfig (optionally with a custom Density)
// - call run once to build the world, then update every frame with the viewer position
// - read chunk meshes and outlines from the manager
