use std::path::Path;

use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::assets::imported::ImportedMesh;
use crate::errors::ImportError;
use crate::resources::mesh::Mesh;
use crate::resources::vertex::AnimatedVertex;

/// A bone of the model-wide palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Slot in the palette returned by animation evaluation.
    pub index: u32,
    /// Inverse-bind (offset) matrix: mesh space to bone space at bind time.
    pub inverse_bind: Mat4,
}

/// Bone names mapped to dense palette indices, in first-seen order.
///
/// Bones with the same name across meshes share one entry; the offset
/// matrix of the first occurrence is kept.
#[derive(Debug, Clone, Default)]
pub struct BoneTable {
    bones: Vec<Bone>,
    lookup: FxHashMap<String, u32>,
}

impl BoneTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from every mesh's bones and writes each influence
    /// into the shared vertex array.
    ///
    /// `imported` and `meshes` are parallel: `meshes[i]` is the assembled
    /// slice of `imported[i]`. Weight vertex ids are mesh-local and are
    /// offset by the mesh's `base_vertex`. Influences beyond the four slots
    /// of a vertex are dropped in arrival order; zero weights are skipped.
    pub fn build(
        path: &Path,
        imported: &[ImportedMesh],
        meshes: &[Mesh],
        vertices: &mut [AnimatedVertex],
    ) -> Result<Self, ImportError> {
        let mut table = Self::new();
        let mut dropped = 0usize;

        for (source, mesh) in imported.iter().zip(meshes) {
            for bone in &source.bones {
                let bone_index = table.resolve(&bone.name, bone.offset_matrix);

                for weight in &bone.weights {
                    if weight.vertex_id >= mesh.vertex_count {
                        return Err(ImportError::BoneWeightOutOfRange {
                            path: path.to_path_buf(),
                            mesh: mesh.name.clone(),
                            bone: bone.name.clone(),
                            vertex_id: weight.vertex_id,
                            vertex_count: mesh.vertex_count as usize,
                        });
                    }
                    if weight.weight == 0.0 {
                        continue;
                    }

                    let global = (mesh.base_vertex + weight.vertex_id) as usize;
                    if !vertices[global].add_bone_data(bone_index, weight.weight) {
                        dropped += 1;
                    }
                }
            }
        }

        if dropped > 0 {
            log::debug!(
                "{}: dropped {dropped} bone influences beyond {} per vertex",
                path.display(),
                crate::resources::vertex::MAX_BONE_INFLUENCES
            );
        }
        log::debug!("{}: bone table has {} bones", path.display(), table.len());

        Ok(table)
    }

    /// Returns the palette index for `name`, registering it with
    /// `inverse_bind` if it is new.
    pub fn resolve(&mut self, name: &str, inverse_bind: Mat4) -> u32 {
        if let Some(&index) = self.lookup.get(name) {
            return index;
        }
        let index = self.bones.len() as u32;
        self.bones.push(Bone {
            name: name.to_string(),
            index,
            inverse_bind,
        });
        self.lookup.insert(name.to_string(), index);
        index
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.lookup.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Bone> {
        self.bones.get(index as usize)
    }

    /// Bones in palette order.
    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
