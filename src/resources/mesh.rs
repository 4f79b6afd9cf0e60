use std::ops::Range;

use glam::Mat4;

use crate::resources::texture::TextureBinding;

/// A drawable slice of the model's shared vertex and index buffers.
///
/// Everything except `node_name` and `transform` is fixed by the assembler;
/// those two are written once by the hierarchy pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    /// First vertex of this mesh in the shared vertex array.
    pub base_vertex: u32,
    /// First triangle of this mesh in the shared index array.
    pub base_index: u32,
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub material_index: Option<usize>,
    /// Name of the node that owns this mesh; empty if no node references it.
    pub node_name: String,
    /// Accumulated bind-pose world transform of the owning node.
    pub transform: Mat4,
    pub textures: Vec<TextureBinding>,
}

impl Mesh {
    #[inline]
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.triangle_count * 3
    }

    /// Range into the flattened `u32` index buffer, suitable for an indexed
    /// draw with `base_vertex` as the vertex offset.
    #[must_use]
    pub fn index_range(&self) -> Range<u32> {
        let first = self.base_index * 3;
        first..first + self.index_count()
    }
}
