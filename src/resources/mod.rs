//! CPU-side geometry
//!
//! Vertex layouts, per-mesh slices of the shared buffers, texture
//! references, and the assembler that builds them from an imported scene.

pub mod assembler;
pub mod mesh;
pub mod texture;
pub mod vertex;

pub use assembler::{AssembledGeometry, assemble};
pub use mesh::Mesh;
pub use texture::{TextureBinding, TextureSource};
pub use vertex::{AnimatedVertex, Index, MAX_BONE_INFLUENCES, Vertex, VertexData};
