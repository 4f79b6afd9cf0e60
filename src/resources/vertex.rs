use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Maximum bone influences stored per animated vertex.
pub const MAX_BONE_INFLUENCES: usize = 4;

/// One triangle: three indices relative to the owning mesh's base vertex.
pub type Index = [u32; 3];

/// Static vertex layout: position, normal, texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

/// Skinned vertex layout: a [`Vertex`] plus up to four bone influences.
///
/// A slot whose weight is `0.0` is free.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct AnimatedVertex {
    pub vertex: Vertex,
    pub bone_ids: [i32; MAX_BONE_INFLUENCES],
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

impl AnimatedVertex {
    #[must_use]
    pub fn new(vertex: Vertex) -> Self {
        Self {
            vertex,
            ..Self::default()
        }
    }

    /// Stores `(bone, weight)` in the first free slot.
    ///
    /// Returns `false` when all slots are taken; the influence is dropped.
    pub fn add_bone_data(&mut self, bone: u32, weight: f32) -> bool {
        match self.weights.iter().position(|&w| w == 0.0) {
            Some(slot) => {
                self.bone_ids[slot] = bone as i32;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    /// Number of occupied influence slots.
    #[must_use]
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}

/// The model's contiguous vertex array, in exactly one of the two layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexData {
    Static(Vec<Vertex>),
    Animated(Vec<AnimatedVertex>),
}

impl VertexData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Static(vertices) => vertices.len(),
            Self::Animated(vertices) => vertices.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// Raw bytes ready for a vertex buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Static(vertices) => bytemuck::cast_slice(vertices),
            Self::Animated(vertices) => bytemuck::cast_slice(vertices),
        }
    }

    /// Position/normal/uv of vertex `index`, whichever the layout.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        match self {
            Self::Static(vertices) => vertices.get(index),
            Self::Animated(vertices) => vertices.get(index).map(|v| &v.vertex),
        }
    }
}
