//! Neutral, format-independent form of an imported scene.
//!
//! Importers translate their source format into these types; everything
//! downstream (assembly, hierarchy, bones, animation) only sees this form.

use std::path::Path;

use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

use crate::animation::AnimationClip;
use crate::errors::ImportError;
use crate::resources::texture::TextureBinding;
use crate::scene::NodeTree;

/// Vertex indices of one face. Triangles stay inline.
pub type Face = SmallVec<[u32; 3]>;

/// One influence of a bone on a mesh-local vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

/// A bone as referenced by one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedBone {
    pub name: String,
    /// Inverse-bind matrix: mesh space to bone space at bind time.
    pub offset_matrix: Mat4,
    pub weights: Vec<VertexWeight>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Option<Vec<Vec3>>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords: Option<Vec<Vec2>>,
    pub faces: Vec<Face>,
    pub material_index: Option<usize>,
    pub bones: Vec<ImportedBone>,
}

impl ImportedMesh {
    /// Number of vertices, taken from the position stream.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.as_ref().map_or(0, Vec::len)
    }

    /// Positions and normals, after checking both are present and agree on
    /// the vertex count.
    pub fn required_attributes(&self, path: &Path) -> Result<(&[Vec3], &[Vec3]), ImportError> {
        let positions = match self.positions.as_deref() {
            Some(positions) if !positions.is_empty() => positions,
            _ => {
                return Err(ImportError::MissingPositions {
                    path: path.to_path_buf(),
                    mesh: self.name.clone(),
                });
            }
        };
        let Some(normals) = self.normals.as_deref() else {
            return Err(ImportError::MissingNormals {
                path: path.to_path_buf(),
                mesh: self.name.clone(),
            });
        };
        if normals.len() != positions.len() {
            return Err(ImportError::AttributeCountMismatch {
                path: path.to_path_buf(),
                mesh: self.name.clone(),
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        Ok((positions, normals))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMaterial {
    pub name: String,
    pub textures: Vec<TextureBinding>,
}

/// Everything an importer hands over: node tree, flat mesh list in import
/// order, materials and animations.
#[derive(Debug, Clone)]
pub struct ImportedScene {
    pub nodes: NodeTree,
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
    pub animations: Vec<AnimationClip>,
}

impl ImportedScene {
    #[must_use]
    pub fn new(nodes: NodeTree, meshes: Vec<ImportedMesh>) -> Self {
        Self {
            nodes,
            meshes,
            materials: Vec::new(),
            animations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_materials(mut self, materials: Vec<ImportedMaterial>) -> Self {
        self.materials = materials;
        self
    }

    #[must_use]
    pub fn with_animations(mut self, animations: Vec<AnimationClip>) -> Self {
        self.animations = animations;
        self
    }

    /// True if any animation has at least one channel. Decides the vertex
    /// layout for the whole model.
    #[must_use]
    pub fn has_animation_channels(&self) -> bool {
        self.animations.iter().any(|clip| !clip.channels().is_empty())
    }

    /// Checks the scene-level requirements every model must meet: at least
    /// one mesh, and positions plus normals on every mesh.
    pub fn validate(&self, path: &Path) -> Result<(), ImportError> {
        if self.meshes.is_empty() {
            return Err(ImportError::NoMeshes {
                path: path.to_path_buf(),
            });
        }
        for mesh in &self.meshes {
            mesh.required_attributes(path)?;
        }
        Ok(())
    }
}
