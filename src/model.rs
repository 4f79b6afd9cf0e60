//! Model
//!
//! A loaded asset together with everything derived from it at load time:
//! shared vertex and index arrays, per-mesh draw slices, the bone table and
//! the root's global inverse transform.
//!
//! ```rust,ignore
//! use rigplay::Model;
//!
//! let model = Model::load("assets/character.glb")?;
//! let palette = model.evaluate(elapsed % duration)?;
//! renderer.upload_bones(&palette);
//! for draw in model.draw_commands() {
//!     renderer.draw(draw);
//! }
//! ```
//!
//! Loading is all-or-nothing: any [`ImportError`] aborts the load and no
//! partial model is returned. After loading, the model is read-only;
//! [`Model::evaluate`] takes `&self` and returns a fresh palette.

use std::path::{Path, PathBuf};

use glam::Mat4;

use crate::animation::{AnimationClip, PoseEvaluator};
use crate::assets::{GltfImporter, ImportSettings, ImportedScene, SceneImporter};
use crate::errors::{ImportError, InvariantViolation};
use crate::render::{DrawCommand, GeometryUploader, VertexLayout};
use crate::resources::{AssembledGeometry, Index, Mesh, VertexData, assemble};
use crate::scene::{BoneTable, NodeTree, propagate_mesh_transforms};

#[derive(Debug, Clone)]
pub struct Model {
    file_path: PathBuf,
    scene: ImportedScene,
    meshes: Vec<Mesh>,
    vertices: VertexData,
    indices: Vec<Index>,
    bones: BoneTable,
    global_inverse: Mat4,
    layout: VertexLayout,
}

impl Model {
    /// Loads a glTF model with the default [`ImportSettings`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        Self::load_with_settings(path, &ImportSettings::default())
    }

    pub fn load_with_settings(
        path: impl AsRef<Path>,
        settings: &ImportSettings,
    ) -> Result<Self, ImportError> {
        Self::load_with(&GltfImporter, path, settings)
    }

    /// Loads a model through a custom importer.
    pub fn load_with<I: SceneImporter + ?Sized>(
        importer: &I,
        path: impl AsRef<Path>,
        settings: &ImportSettings,
    ) -> Result<Self, ImportError> {
        let path = path.as_ref();
        log::info!("Loading model from: {}", path.display());

        let scene = importer.import(path, settings)?;
        Self::from_imported(scene, path)
    }

    /// Builds a model from an already imported scene.
    ///
    /// Runs validation, mesh assembly, the hierarchy pass and, for animated
    /// scenes, the bone table, in that order.
    pub fn from_imported(scene: ImportedScene, path: impl Into<PathBuf>) -> Result<Self, ImportError> {
        let file_path = path.into();
        scene.validate(&file_path)?;

        let animated = scene.has_animation_channels();
        let AssembledGeometry {
            mut meshes,
            mut vertices,
            indices,
        } = assemble(&file_path, &scene, animated)?;

        propagate_mesh_transforms(&file_path, &scene.nodes, &mut meshes);

        let bones = match &mut vertices {
            VertexData::Animated(skinned) => {
                BoneTable::build(&file_path, &scene.meshes, &meshes, skinned)?
            }
            VertexData::Static(_) => {
                if scene.meshes.iter().any(|mesh| !mesh.bones.is_empty()) {
                    log::debug!(
                        "{}: skin data ignored, the model has no animation",
                        file_path.display()
                    );
                }
                BoneTable::new()
            }
        };

        for bone in bones.bones() {
            if scene.nodes.find_reachable(&bone.name).is_none() {
                log::warn!(
                    "{}: bone '{}' has no matching node and stays at identity",
                    file_path.display(),
                    bone.name
                );
            }
        }

        let root_transform = scene
            .nodes
            .get(scene.nodes.root())
            .map_or(Mat4::IDENTITY, |root| root.transform);

        if scene.animations.len() > 1 {
            log::info!(
                "{}: {} animations found, evaluating '{}'",
                file_path.display(),
                scene.animations.len(),
                scene.animations[0].name
            );
        }

        Ok(Self {
            file_path,
            meshes,
            indices,
            bones,
            global_inverse: root_transform.inverse(),
            layout: VertexLayout::for_animated(animated),
            vertices,
            scene,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &VertexData {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    /// The triangle list as a flat index buffer.
    #[must_use]
    pub fn index_data(&self) -> &[u32] {
        bytemuck::cast_slice(&self.indices)
    }

    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        self.vertices.as_bytes()
    }

    #[inline]
    #[must_use]
    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &BoneTable {
        &self.bones
    }

    /// True if the scene has at least one animation channel. Decides the
    /// vertex layout of every mesh.
    #[inline]
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.vertices.is_animated()
    }

    /// Inverse of the root node's bind transform.
    #[inline]
    #[must_use]
    pub fn global_inverse_transform(&self) -> Mat4 {
        self.global_inverse
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &NodeTree {
        &self.scene.nodes
    }

    /// The clip [`evaluate`](Self::evaluate) plays: the first one imported.
    #[must_use]
    pub fn animation(&self) -> Option<&AnimationClip> {
        self.scene.animations.first()
    }

    /// Every imported clip, including those never evaluated.
    #[must_use]
    pub fn animations(&self) -> &[AnimationClip] {
        &self.scene.animations
    }

    pub fn draw_commands(&self) -> impl Iterator<Item = DrawCommand<'_>> {
        self.meshes.iter().map(DrawCommand::from)
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Final bone transforms at `time`, indexed by bone index.
    ///
    /// Times outside the keyed range are not wrapped; loop by passing
    /// `time % duration`.
    pub fn evaluate(&self, time: f32) -> Result<Vec<Mat4>, InvariantViolation> {
        self.evaluator().evaluate(time)
    }

    /// Like [`evaluate`](Self::evaluate), writing into a reusable buffer.
    pub fn evaluate_into(&self, time: f32, palette: &mut Vec<Mat4>) -> Result<(), InvariantViolation> {
        self.evaluator().evaluate_into(time, palette)
    }

    fn evaluator(&self) -> PoseEvaluator<'_> {
        PoseEvaluator::new(
            &self.scene.nodes,
            &self.bones,
            self.animation(),
            self.global_inverse,
        )
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Hands the shared vertex and index buffers to the renderer.
    pub fn upload_geometry<U: GeometryUploader + ?Sized>(&self, uploader: &mut U) -> Result<(), U::Error> {
        uploader.upload(self.vertex_bytes(), &self.layout, self.index_data())
    }
}
