//! Rendering collaborator interfaces
//!
//! The crate does not own a GPU device. It hands geometry to a
//! [`GeometryUploader`] and describes each mesh draw with a [`DrawCommand`];
//! buffer creation, shader binding and submission belong to the renderer.

pub mod submission;
pub mod vertex_layout;

pub use submission::DrawCommand;
pub use vertex_layout::VertexLayout;

/// Receives a model's shared vertex and index buffers.
///
/// Typically implemented by a renderer on top of `wgpu::Device` buffer
/// creation. `vertices` is laid out as described by `layout`; `indices` are
/// triangle indices relative to each mesh's base vertex.
pub trait GeometryUploader {
    type Error;

    fn upload(
        &mut self,
        vertices: &[u8],
        layout: &VertexLayout,
        indices: &[u32],
    ) -> Result<(), Self::Error>;
}
