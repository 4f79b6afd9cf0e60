//! Vertex Layout
//!
//! Describes the attribute layout of a model's shared vertex buffer in wgpu
//! terms. Offsets and stride come straight from the `#[repr(C)]` vertex
//! structs, so the description can never drift from the data.

use std::mem::{offset_of, size_of};

use wgpu::{VertexAttribute, VertexFormat, VertexStepMode};

use crate::resources::vertex::{AnimatedVertex, Vertex};

pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const TEX_COORD_LOCATION: u32 = 2;
pub const BONE_IDS_LOCATION: u32 = 3;
pub const BONE_WEIGHTS_LOCATION: u32 = 4;

/// Owned vertex buffer description; see [`VertexLayout::as_wgpu`].
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub array_stride: u64,
    pub step_mode: VertexStepMode,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Position, normal and texture coordinate.
    #[must_use]
    pub fn static_mesh() -> Self {
        Self {
            array_stride: size_of::<Vertex>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: base_attributes(0).to_vec(),
        }
    }

    /// The static attributes plus four bone ids and four weights.
    #[must_use]
    pub fn animated_mesh() -> Self {
        let base = offset_of!(AnimatedVertex, vertex) as u64;
        let mut attributes = base_attributes(base).to_vec();
        attributes.extend([
            VertexAttribute {
                format: VertexFormat::Sint32x4,
                offset: offset_of!(AnimatedVertex, bone_ids) as u64,
                shader_location: BONE_IDS_LOCATION,
            },
            VertexAttribute {
                format: VertexFormat::Float32x4,
                offset: offset_of!(AnimatedVertex, weights) as u64,
                shader_location: BONE_WEIGHTS_LOCATION,
            },
        ]);

        Self {
            array_stride: size_of::<AnimatedVertex>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes,
        }
    }

    #[must_use]
    pub fn for_animated(animated: bool) -> Self {
        if animated {
            Self::animated_mesh()
        } else {
            Self::static_mesh()
        }
    }

    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }
}

fn base_attributes(base: u64) -> [VertexAttribute; 3] {
    [
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: base + offset_of!(Vertex, position) as u64,
            shader_location: POSITION_LOCATION,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: base + offset_of!(Vertex, normal) as u64,
            shader_location: NORMAL_LOCATION,
        },
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: base + offset_of!(Vertex, tex_coord) as u64,
            shader_location: TEX_COORD_LOCATION,
        },
    ]
}
