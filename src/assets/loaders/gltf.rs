use std::ops::Range;
use std::path::Path;

use glam::{Mat4, Quat, Vec2, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation, Property};
use gltf::mesh::Mode;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::animation::{AnimationClip, KeyframeTrack, NodeChannel};
use crate::assets::SceneImporter;
use crate::assets::imported::{
    Face, ImportedBone, ImportedMaterial, ImportedMesh, ImportedScene, VertexWeight,
};
use crate::assets::settings::{ImportFlags, ImportSettings};
use crate::errors::ImportError;
use crate::resources::texture::{TextureBinding, TextureSource};
use crate::resources::vertex::MAX_BONE_INFLUENCES;
use crate::scene::{Node, NodeIndex, NodeTree};

/// Raw `JOINTS_n` / `WEIGHTS_n` pairs of one influence set, per vertex.
type InfluenceSet = Vec<([u16; 4], [f32; 4])>;

/// Influences gathered for one vertex across all sets.
type VertexInfluences = SmallVec<[(u16, f32); 8]>;

/// Imports `.gltf` and `.glb` scenes.
///
/// External and data-URI buffers are loaded; images are referenced, never
/// decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl SceneImporter for GltfImporter {
    fn import(&self, path: &Path, settings: &ImportSettings) -> Result<ImportedScene, ImportError> {
        let gltf::Gltf { document, blob } =
            gltf::Gltf::open(path).map_err(|err| ImportError::unreadable(path, err))?;

        let base_dir = path.parent().unwrap_or(Path::new("./"));
        let buffers = gltf::import_buffers(&document, Some(base_dir), blob)
            .map_err(|err| ImportError::unreadable(path, err))?;

        for extension in document.extensions_used() {
            log::warn!(
                "{}: glTF extension '{extension}' is not supported and will be ignored",
                path.display()
            );
        }

        let builder = SceneBuilder {
            document: &document,
            buffers: &buffers,
            base_dir,
            path,
            settings,
        };
        Ok(builder.build())
    }
}

struct SceneBuilder<'a> {
    document: &'a gltf::Document,
    buffers: &'a [gltf::buffer::Data],
    base_dir: &'a Path,
    path: &'a Path,
    settings: &'a ImportSettings,
}

impl<'a> SceneBuilder<'a> {
    fn build(&self) -> ImportedScene {
        let (meshes, mesh_ranges) = self.load_meshes();
        let nodes = self.load_nodes(&mesh_ranges);
        let materials = self.load_materials();
        let animations = self.load_animations();

        log::debug!(
            "{}: imported {} nodes, {} meshes, {} materials, {} animations",
            self.path.display(),
            nodes.len(),
            meshes.len(),
            materials.len(),
            animations.len()
        );

        ImportedScene::new(nodes, meshes)
            .with_materials(materials)
            .with_animations(animations)
    }

    fn buffer_data(&self, buffer: gltf::Buffer<'_>) -> Option<&'a [u8]> {
        self.buffers.get(buffer.index()).map(|data| data.0.as_slice())
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    fn load_nodes(&self, mesh_ranges: &[Range<usize>]) -> NodeTree {
        let mut nodes: Vec<Node> = self
            .document
            .nodes()
            .map(|gltf_node| {
                let mut node = Node::new(
                    node_name(&gltf_node),
                    Mat4::from_cols_array_2d(&gltf_node.transform().matrix()),
                );
                if let Some(mesh) = gltf_node.mesh() {
                    node.meshes.extend(mesh_ranges[mesh.index()].clone());
                }
                node.children = gltf_node
                    .children()
                    .map(|child| NodeIndex::new(child.index()))
                    .collect();
                node
            })
            .collect();

        let scene = self
            .document
            .default_scene()
            .or_else(|| self.document.scenes().next());

        let roots: Vec<NodeIndex> = match &scene {
            Some(scene) => scene.nodes().map(|n| NodeIndex::new(n.index())).collect(),
            None => {
                // No scene list: every node nobody claims as a child is a root.
                let mut claimed = vec![false; nodes.len()];
                for node in &nodes {
                    for child in &node.children {
                        claimed[child.index()] = true;
                    }
                }
                (0..nodes.len())
                    .filter(|&i| !claimed[i])
                    .map(NodeIndex::new)
                    .collect()
            }
        };

        if let [root] = roots.as_slice() {
            return NodeTree::from_parts(nodes, *root);
        }

        let root_name = scene
            .as_ref()
            .and_then(|s| s.name())
            .unwrap_or("Scene")
            .to_string();
        let mut root = Node::new(root_name, Mat4::IDENTITY);
        root.children = roots;
        let root_index = NodeIndex::new(nodes.len());
        nodes.push(root);

        NodeTree::with_synthetic_root(nodes, root_index)
    }

    // ========================================================================
    // Meshes
    // ========================================================================

    /// Flattens every primitive into one mesh, in document order. Returns the
    /// meshes plus, per glTF mesh, the range of flat indices it produced.
    fn load_meshes(&self) -> (Vec<ImportedMesh>, Vec<Range<usize>>) {
        let mut mesh_skins: Vec<Option<gltf::Skin<'a>>> = vec![None; self.document.meshes().count()];
        for node in self.document.nodes() {
            if let (Some(mesh), Some(skin)) = (node.mesh(), node.skin()) {
                let slot = &mut mesh_skins[mesh.index()];
                if let Some(existing) = slot.as_ref() {
                    if existing.index() != skin.index() {
                        log::warn!(
                            "{}: mesh {} is bound to several skins; using skin {}",
                            self.path.display(),
                            mesh.index(),
                            existing.index()
                        );
                    }
                } else {
                    *slot = Some(skin);
                }
            }
        }

        let mut meshes = Vec::new();
        let mut ranges = Vec::with_capacity(mesh_skins.len());

        for mesh in self.document.meshes() {
            let start = meshes.len();
            let base_name = mesh
                .name()
                .map_or_else(|| format!("Mesh_{}", mesh.index()), str::to_string);
            let primitive_count = mesh.primitives().count();

            for primitive in mesh.primitives() {
                let name = if primitive_count == 1 {
                    base_name.clone()
                } else {
                    format!("{base_name}-{}", primitive.index())
                };
                meshes.push(self.load_primitive(
                    name,
                    &primitive,
                    mesh_skins[mesh.index()].as_ref(),
                ));
            }

            ranges.push(start..meshes.len());
        }

        (meshes, ranges)
    }

    fn load_primitive(
        &self,
        name: String,
        primitive: &gltf::Primitive<'_>,
        skin: Option<&gltf::Skin<'_>>,
    ) -> ImportedMesh {
        let reader = primitive.reader(|buffer| self.buffer_data(buffer));
        let flip_uvs = self.settings.has(ImportFlags::FLIP_UVS);

        let positions: Option<Vec<Vec3>> = reader
            .read_positions()
            .map(|iter| iter.map(Vec3::from_array).collect());
        let normals: Option<Vec<Vec3>> = reader
            .read_normals()
            .map(|iter| iter.map(Vec3::from_array).collect());
        let tex_coords: Option<Vec<Vec2>> = reader.read_tex_coords(0).map(|coords| {
            coords
                .into_f32()
                .map(|[u, v]| Vec2::new(u, if flip_uvs { 1.0 - v } else { v }))
                .collect()
        });

        let vertex_count = positions.as_ref().map_or(0, Vec::len);

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => {
                log::warn!(
                    "{}: primitive '{name}' has no indices; generating sequential ones",
                    self.path.display()
                );
                (0..vertex_count as u32).collect()
            }
        };

        let triangulate = self.settings.has(ImportFlags::TRIANGULATE);
        let faces = build_faces(primitive.mode(), &indices, triangulate);
        if faces.is_empty() && !indices.is_empty() {
            log::warn!(
                "{}: primitive '{name}' produced no faces from {} indices",
                self.path.display(),
                indices.len()
            );
        }

        let bones = match skin {
            Some(skin) => {
                let influence_sets: Vec<InfluenceSet> = (0..2)
                    .filter_map(|set| {
                        let joints = reader.read_joints(set)?;
                        let weights = reader.read_weights(set)?;
                        Some(joints.into_u16().zip(weights.into_f32()).collect())
                    })
                    .collect();
                self.skin_bones(&name, skin, &influence_sets, vertex_count)
            }
            None => Vec::new(),
        };

        ImportedMesh {
            name,
            positions,
            normals,
            tex_coords,
            faces,
            material_index: primitive.material().index(),
            bones,
        }
    }

    /// One bone per skin joint, carrying the weights this primitive assigns
    /// to it in vertex order.
    fn skin_bones(
        &self,
        mesh_name: &str,
        skin: &gltf::Skin<'_>,
        influence_sets: &[InfluenceSet],
        vertex_count: usize,
    ) -> Vec<ImportedBone> {
        let inverse_bind_matrices: Vec<Mat4> = skin
            .reader(|buffer| self.buffer_data(buffer))
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
            .unwrap_or_default();

        let mut bones: Vec<ImportedBone> = skin
            .joints()
            .enumerate()
            .map(|(joint, node)| ImportedBone {
                name: node_name(&node),
                offset_matrix: inverse_bind_matrices
                    .get(joint)
                    .copied()
                    .unwrap_or(Mat4::IDENTITY),
                weights: Vec::new(),
            })
            .collect();

        let mut influences: Vec<VertexInfluences> = vec![SmallVec::new(); vertex_count];
        for set in influence_sets {
            for (vertex, (joints, weights)) in influences.iter_mut().zip(set) {
                for (&joint, &weight) in joints.iter().zip(weights) {
                    if weight > 0.0 {
                        vertex.push((joint, weight));
                    }
                }
            }
        }

        if self.settings.has(ImportFlags::LIMIT_BONE_WEIGHTS) {
            for vertex in &mut influences {
                limit_influences(vertex, MAX_BONE_INFLUENCES);
            }
        }

        let mut outside_skin = 0usize;
        for (vertex_id, vertex) in influences.iter().enumerate() {
            for &(joint, weight) in vertex {
                match bones.get_mut(usize::from(joint)) {
                    Some(bone) => bone.weights.push(VertexWeight {
                        vertex_id: vertex_id as u32,
                        weight,
                    }),
                    None => outside_skin += 1,
                }
            }
        }
        if outside_skin > 0 {
            log::warn!(
                "{}: mesh '{mesh_name}' has {outside_skin} influences on joints outside skin {}",
                self.path.display(),
                skin.index()
            );
        }

        bones
    }

    // ========================================================================
    // Materials
    // ========================================================================

    fn load_materials(&self) -> Vec<ImportedMaterial> {
        self.document
            .materials()
            .map(|material| {
                let mut textures = Vec::new();
                if let Some(info) = material.pbr_metallic_roughness().base_color_texture() {
                    textures.push(TextureBinding::new(
                        self.texture_source(&info.texture()),
                        self.settings.diffuse_uniform.clone(),
                    ));
                }
                if let Some(normal) = material.normal_texture() {
                    textures.push(TextureBinding::new(
                        self.texture_source(&normal.texture()),
                        self.settings.normal_uniform.clone(),
                    ));
                }

                ImportedMaterial {
                    name: material.name().unwrap_or_default().to_string(),
                    textures,
                }
            })
            .collect()
    }

    fn texture_source(&self, texture: &gltf::Texture<'_>) -> TextureSource {
        let image = texture.source();
        match image.source() {
            gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
                TextureSource::Uri(self.base_dir.join(uri))
            }
            _ => TextureSource::Embedded {
                image: image.index(),
            },
        }
    }

    // ========================================================================
    // Animations
    // ========================================================================

    fn load_animations(&self) -> Vec<AnimationClip> {
        self.document
            .animations()
            .map(|animation| {
                let name = animation
                    .name()
                    .map_or_else(|| format!("Animation_{}", animation.index()), str::to_string);

                // Channels of one node are merged; keep first-seen node order.
                let mut order: Vec<usize> = Vec::new();
                let mut parts: FxHashMap<usize, ChannelParts> = FxHashMap::default();

                for channel in animation.channels() {
                    let target = channel.target();
                    let node_index = target.node().index();
                    let reader = channel.reader(|buffer| self.buffer_data(buffer));

                    let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
                    else {
                        log::warn!(
                            "{}: animation '{name}' has a channel without sampler data; skipped",
                            self.path.display()
                        );
                        continue;
                    };
                    let times: Vec<f32> = inputs.collect();

                    let interpolation = channel.sampler().interpolation();
                    if interpolation != Interpolation::Linear {
                        log::warn!(
                            "{}: animation '{name}' uses {interpolation:?} interpolation; sampling it linearly",
                            self.path.display()
                        );
                    }

                    let entry = parts.entry(node_index).or_insert_with(|| {
                        order.push(node_index);
                        ChannelParts::default()
                    });

                    match (target.property(), outputs) {
                        (Property::Translation, ReadOutputs::Translations(iter)) => {
                            let values = key_values(iter.map(Vec3::from_array).collect(), interpolation);
                            entry.positions = Some(KeyframeTrack::new(times, values));
                        }
                        (Property::Rotation, ReadOutputs::Rotations(iter)) => {
                            let values =
                                key_values(iter.into_f32().map(Quat::from_array).collect(), interpolation);
                            entry.rotations = Some(KeyframeTrack::new(times, values));
                        }
                        (Property::Scale, ReadOutputs::Scales(iter)) => {
                            let values = key_values(iter.map(Vec3::from_array).collect(), interpolation);
                            entry.scales = Some(KeyframeTrack::new(times, values));
                        }
                        (property, _) => log::warn!(
                            "{}: animation '{name}' targets unsupported property {property:?}; skipped",
                            self.path.display()
                        ),
                    }
                }

                let channels = order
                    .into_iter()
                    .filter_map(|node_index| {
                        let node = self.document.nodes().nth(node_index)?;
                        let parts = parts.remove(&node_index)?;
                        parts.into_channel(&node)
                    })
                    .collect();

                AnimationClip::new(name, channels)
            })
            .collect()
    }
}

#[derive(Default)]
struct ChannelParts {
    positions: Option<KeyframeTrack<Vec3>>,
    rotations: Option<KeyframeTrack<Quat>>,
    scales: Option<KeyframeTrack<Vec3>>,
}

impl ChannelParts {
    /// Completes a node channel, filling unanimated properties with the
    /// node's bind-pose value. Returns `None` if nothing usable was read.
    fn into_channel(self, node: &gltf::Node<'_>) -> Option<NodeChannel> {
        if self.positions.is_none() && self.rotations.is_none() && self.scales.is_none() {
            return None;
        }
        let (translation, rotation, scale) = node.transform().decomposed();
        Some(NodeChannel::new(
            node_name(node),
            self.positions
                .unwrap_or_else(|| KeyframeTrack::constant(Vec3::from_array(translation))),
            self.rotations
                .unwrap_or_else(|| KeyframeTrack::constant(Quat::from_array(rotation))),
            self.scales
                .unwrap_or_else(|| KeyframeTrack::constant(Vec3::from_array(scale))),
        ))
    }
}

fn node_name(node: &gltf::Node<'_>) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

/// Cubic-spline samplers store `(in-tangent, value, out-tangent)` triples;
/// keep only the value.
fn key_values<T: Copy>(values: Vec<T>, interpolation: Interpolation) -> Vec<T> {
    match interpolation {
        Interpolation::CubicSpline => values.chunks_exact(3).map(|triple| triple[1]).collect(),
        _ => values,
    }
}

/// Keeps the `max` strongest influences and renormalises them to sum to 1.
/// Ties keep source order.
fn limit_influences(influences: &mut VertexInfluences, max: usize) {
    if influences.len() <= max {
        return;
    }
    influences.sort_by(|a, b| b.1.total_cmp(&a.1));
    influences.truncate(max);

    let total: f32 = influences.iter().map(|&(_, weight)| weight).sum();
    if total > 0.0 {
        for (_, weight) in influences.iter_mut() {
            *weight /= total;
        }
    }
}

/// Expands a primitive's index list into faces according to its mode.
///
/// Points and lines produce 1- and 2-index faces; triangle lists keep any
/// trailing partial triangle as a short face so it is reported rather than
/// dropped.
fn build_faces(mode: Mode, indices: &[u32], triangulate: bool) -> Vec<Face> {
    match mode {
        Mode::Points => indices.iter().map(|&i| Face::from_slice(&[i])).collect(),
        Mode::Lines => indices.chunks(2).map(Face::from_slice).collect(),
        Mode::LineStrip => indices.windows(2).map(Face::from_slice).collect(),
        Mode::LineLoop => {
            let mut faces: Vec<Face> = indices.windows(2).map(Face::from_slice).collect();
            if let (Some(&first), Some(&last)) = (indices.first(), indices.last()) {
                if indices.len() > 2 {
                    faces.push(Face::from_slice(&[last, first]));
                }
            }
            faces
        }
        Mode::Triangles => indices.chunks(3).map(Face::from_slice).collect(),
        Mode::TriangleStrip | Mode::TriangleFan if !triangulate => {
            if indices.is_empty() {
                Vec::new()
            } else {
                vec![Face::from_slice(indices)]
            }
        }
        Mode::TriangleStrip => (0..indices.len().saturating_sub(2))
            .map(|i| {
                if i % 2 == 0 {
                    [indices[i], indices[i + 1], indices[i + 2]]
                } else {
                    [indices[i], indices[i + 2], indices[i + 1]]
                }
            })
            .filter(|t| !is_degenerate(t))
            .map(Face::from)
            .collect(),
        Mode::TriangleFan => (0..indices.len().saturating_sub(2))
            .map(|i| [indices[i + 1], indices[i + 2], indices[0]])
            .filter(|t| !is_degenerate(t))
            .map(Face::from)
            .collect(),
    }
}

fn is_degenerate(triangle: &[u32; 3]) -> bool {
    triangle[0] == triangle[1] || triangle[1] == triangle[2] || triangle[0] == triangle[2]
}
