use std::ops::Range;

use glam::Mat4;

use crate::resources::mesh::Mesh;
use crate::resources::texture::TextureBinding;

/// Everything the renderer needs to issue one indexed draw for a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand<'a> {
    pub mesh_name: &'a str,
    /// Added to every index before fetching a vertex.
    pub base_vertex: i32,
    /// Range into the flat `u32` index buffer.
    pub index_range: Range<u32>,
    pub transform: Mat4,
    pub textures: &'a [TextureBinding],
}

impl<'a> From<&'a Mesh> for DrawCommand<'a> {
    fn from(mesh: &'a Mesh) -> Self {
        Self {
            mesh_name: &mesh.name,
            base_vertex: mesh.base_vertex as i32,
            index_range: mesh.index_range(),
            transform: mesh.transform,
            textures: &mesh.textures,
        }
    }
}
