//! Shared helpers for the integration tests.
//!
//! - In-memory [`ImportedScene`] builders for assembler, hierarchy, bone and
//!   animation tests
//! - [`GltfFixture`], a tiny glTF writer with an embedded base64 buffer, for
//!   importer tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use glam::{Mat4, Quat, Vec2, Vec3};
use serde_json::{Value, json};

use rigplay::animation::{AnimationClip, KeyframeTrack, NodeChannel};
use rigplay::assets::{Face, ImportedBone, ImportedMesh, ImportedScene, VertexWeight};
use rigplay::scene::{Node, NodeTree};

pub const EPSILON: f32 = 1e-5;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// In-memory scenes
// ============================================================================

/// A mesh with `vertex_count` vertices along +X and one triangle per three
/// consecutive vertices.
pub fn strip_mesh(name: &str, vertex_count: usize) -> ImportedMesh {
    let positions: Vec<Vec3> = (0..vertex_count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
    let faces = (0..vertex_count as u32 / 3)
        .map(|t| Face::from_slice(&[t * 3, t * 3 + 1, t * 3 + 2]))
        .collect();

    ImportedMesh {
        name: name.to_string(),
        positions: Some(positions),
        normals: Some(vec![Vec3::Z; vertex_count]),
        tex_coords: Some(vec![Vec2::new(0.25, 0.75); vertex_count]),
        faces,
        ..Default::default()
    }
}

pub fn triangle_mesh(name: &str) -> ImportedMesh {
    strip_mesh(name, 3)
}

pub fn bone(name: &str, offset: Mat4, weights: &[(u32, f32)]) -> ImportedBone {
    ImportedBone {
        name: name.to_string(),
        offset_matrix: offset,
        weights: weights
            .iter()
            .map(|&(vertex_id, weight)| VertexWeight { vertex_id, weight })
            .collect(),
    }
}

/// Root node named `"root"` owning every mesh.
pub fn single_node_scene(meshes: Vec<ImportedMesh>) -> ImportedScene {
    let root = Node::new("root", Mat4::IDENTITY).with_meshes(0..meshes.len());
    ImportedScene::new(NodeTree::new(root), meshes)
}

/// Channel animating only translation; rotation and scale stay at identity.
pub fn translation_channel(node: &str, times: &[f32], positions: &[Vec3]) -> NodeChannel {
    NodeChannel::new(
        node,
        KeyframeTrack::new(times.to_vec(), positions.to_vec()),
        KeyframeTrack::constant(Quat::IDENTITY),
        KeyframeTrack::constant(Vec3::ONE),
    )
}

pub fn rotation_channel(node: &str, times: &[f32], rotations: &[Quat]) -> NodeChannel {
    NodeChannel::new(
        node,
        KeyframeTrack::constant(Vec3::ZERO),
        KeyframeTrack::new(times.to_vec(), rotations.to_vec()),
        KeyframeTrack::constant(Vec3::ONE),
    )
}

/// root -> `bone_name`, one triangle on the root skinned fully to the bone,
/// and a clip holding `channel`.
pub fn one_bone_scene(bone_name: &str, offset: Mat4, channel: NodeChannel) -> ImportedScene {
    let mut mesh = triangle_mesh("body");
    mesh.bones = vec![bone(bone_name, offset, &[(0, 1.0), (1, 1.0), (2, 1.0)])];

    let mut nodes = NodeTree::new(Node::new("root", Mat4::IDENTITY).with_meshes([0]));
    nodes.add_child(nodes.root(), Node::new(bone_name, Mat4::IDENTITY));

    ImportedScene::new(nodes, vec![mesh])
        .with_animations(vec![AnimationClip::new("clip", vec![channel])])
}

pub fn translation_of(m: Mat4) -> Vec3 {
    m.w_axis.truncate()
}

// ============================================================================
// glTF fixtures
// ============================================================================

const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;

/// Builds a `.gltf` document whose single buffer is an embedded data URI.
///
/// The `add_*` accessor helpers append data and return the accessor index;
/// the structural helpers take raw JSON and return the element index.
#[derive(Default)]
pub struct GltfFixture {
    buffer: Vec<u8>,
    buffer_views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
    scenes: Vec<Value>,
    skins: Vec<Value>,
    animations: Vec<Value>,
    materials: Vec<Value>,
    textures: Vec<Value>,
    images: Vec<Value>,
}

impl GltfFixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_view(&mut self, bytes: &[u8]) -> usize {
        while self.buffer.len() % 4 != 0 {
            self.buffer.push(0);
        }
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        self.buffer_views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
        }));
        self.buffer_views.len() - 1
    }

    fn push_accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn float_accessor(&mut self, components: &[Vec<f32>], kind: &str) -> usize {
        let width = components.first().map_or(0, Vec::len);
        let mut min = vec![f32::MAX; width];
        let mut max = vec![f32::MIN; width];
        let mut bytes = Vec::new();
        for element in components {
            for (i, &value) in element.iter().enumerate() {
                min[i] = min[i].min(value);
                max[i] = max[i].max(value);
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        let view = self.push_view(&bytes);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": components.len(),
            "type": kind,
            "min": min,
            "max": max,
        }))
    }

    pub fn add_scalars(&mut self, values: &[f32]) -> usize {
        let components: Vec<Vec<f32>> = values.iter().map(|&v| vec![v]).collect();
        self.float_accessor(&components, "SCALAR")
    }

    pub fn add_vec2(&mut self, values: &[[f32; 2]]) -> usize {
        let components: Vec<Vec<f32>> = values.iter().map(|v| v.to_vec()).collect();
        self.float_accessor(&components, "VEC2")
    }

    pub fn add_vec3(&mut self, values: &[[f32; 3]]) -> usize {
        let components: Vec<Vec<f32>> = values.iter().map(|v| v.to_vec()).collect();
        self.float_accessor(&components, "VEC3")
    }

    pub fn add_vec4(&mut self, values: &[[f32; 4]]) -> usize {
        let components: Vec<Vec<f32>> = values.iter().map(|v| v.to_vec()).collect();
        self.float_accessor(&components, "VEC4")
    }

    pub fn add_mat4(&mut self, values: &[Mat4]) -> usize {
        let components: Vec<Vec<f32>> = values.iter().map(|m| m.to_cols_array().to_vec()).collect();
        self.float_accessor(&components, "MAT4")
    }

    pub fn add_indices(&mut self, indices: &[u32]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": UNSIGNED_INT,
            "count": indices.len(),
            "type": "SCALAR",
        }))
    }

    pub fn add_joints(&mut self, joints: &[[u16; 4]]) -> usize {
        let bytes: Vec<u8> = joints.iter().flatten().flat_map(|j| j.to_le_bytes()).collect();
        let view = self.push_view(&bytes);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": UNSIGNED_SHORT,
            "count": joints.len(),
            "type": "VEC4",
        }))
    }

    /// Adds position, normal and (optionally) uv accessors for `positions`,
    /// all normals +Z. Returns the primitive's `attributes` object.
    pub fn add_vertices(&mut self, positions: &[[f32; 3]], uvs: Option<&[[f32; 2]]>) -> Value {
        let position = self.add_vec3(positions);
        let normal = self.add_vec3(&vec![[0.0, 0.0, 1.0]; positions.len()]);
        let mut attributes = json!({ "POSITION": position, "NORMAL": normal });
        if let Some(uvs) = uvs {
            attributes["TEXCOORD_0"] = json!(self.add_vec2(uvs));
        }
        attributes
    }

    pub fn add_mesh(&mut self, mesh: Value) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_node(&mut self, node: Value) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_scene(&mut self, scene: Value) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    pub fn add_skin(&mut self, skin: Value) -> usize {
        self.skins.push(skin);
        self.skins.len() - 1
    }

    pub fn add_animation(&mut self, animation: Value) -> usize {
        self.animations.push(animation);
        self.animations.len() - 1
    }

    /// Material whose base-colour texture is an external image at `uri`.
    pub fn add_textured_material(&mut self, name: &str, uri: &str) -> usize {
        self.images.push(json!({ "uri": uri }));
        self.textures.push(json!({ "source": self.images.len() - 1 }));
        self.materials.push(json!({
            "name": name,
            "pbrMetallicRoughness": {
                "baseColorTexture": { "index": self.textures.len() - 1 }
            }
        }));
        self.materials.len() - 1
    }

    pub fn to_json(&self) -> Value {
        let mut buffer = self.buffer.clone();
        while buffer.len() % 4 != 0 {
            buffer.push(0);
        }

        let mut root = json!({
            "asset": { "version": "2.0", "generator": "rigplay tests" },
        });

        if !buffer.is_empty() {
            root["buffers"] = json!([{
                "byteLength": buffer.len(),
                "uri": format!("data:application/octet-stream;base64,{}", STANDARD.encode(&buffer)),
            }]);
        }
        if !self.scenes.is_empty() {
            root["scenes"] = json!(self.scenes);
            root["scene"] = json!(0);
        }
        for (key, list) in [
            ("bufferViews", &self.buffer_views),
            ("accessors", &self.accessors),
            ("meshes", &self.meshes),
            ("nodes", &self.nodes),
            ("skins", &self.skins),
            ("animations", &self.animations),
            ("materials", &self.materials),
            ("textures", &self.textures),
            ("images", &self.images),
        ] {
            if !list.is_empty() {
                root[key] = json!(list);
            }
        }
        root
    }

    /// Writes the document to `dir/name` and returns the full path.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let text = serde_json::to_string_pretty(&self.to_json()).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }
}

/// Unit triangle in the XY plane with uvs at the corners of texture space.
pub fn triangle_positions() -> Vec<[f32; 3]> {
    vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
}

pub fn triangle_uvs() -> Vec<[f32; 2]> {
    vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
}

/// One node holding one indexed triangle mesh.
pub fn triangle_fixture() -> GltfFixture {
    let mut fixture = GltfFixture::new();
    let attributes = fixture.add_vertices(&triangle_positions(), Some(&triangle_uvs()));
    let indices = fixture.add_indices(&[0, 1, 2]);
    let mesh = fixture.add_mesh(json!({
        "name": "triangle",
        "primitives": [{ "attributes": attributes, "indices": indices }]
    }));
    let node = fixture.add_node(json!({ "name": "holder", "mesh": mesh }));
    fixture.add_scene(json!({ "nodes": [node] }));
    fixture
}

/// A skinned triangle driven by a two-joint chain `hip -> knee`, with a
/// translation animation on `knee` from (0,0,0) at t=0 to (10,0,0) at t=10.
pub fn skinned_fixture() -> GltfFixture {
    let mut fixture = GltfFixture::new();

    let mut attributes = fixture.add_vertices(&triangle_positions(), None);
    attributes["JOINTS_0"] = json!(fixture.add_joints(&[[0, 0, 0, 0], [1, 0, 0, 0], [0, 1, 0, 0]]));
    attributes["WEIGHTS_0"] = json!(fixture.add_vec4(&[
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
        [0.5, 0.5, 0.0, 0.0],
    ]));
    let indices = fixture.add_indices(&[0, 1, 2]);
    let mesh = fixture.add_mesh(json!({
        "name": "body",
        "primitives": [{ "attributes": attributes, "indices": indices }]
    }));

    let knee_bind = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
    let inverse_binds = fixture.add_mat4(&[Mat4::IDENTITY, knee_bind.inverse()]);

    // 0: root, 1: hip, 2: knee, 3: skinned mesh holder
    fixture.add_node(json!({ "name": "root", "children": [1, 3] }));
    fixture.add_node(json!({ "name": "hip", "children": [2] }));
    fixture.add_node(json!({ "name": "knee", "translation": [0.0, 1.0, 0.0] }));
    fixture.add_node(json!({ "name": "body", "mesh": mesh, "skin": 0 }));
    fixture.add_skin(json!({ "joints": [1, 2], "inverseBindMatrices": inverse_binds }));
    fixture.add_scene(json!({ "nodes": [0] }));

    let times = fixture.add_scalars(&[0.0, 10.0]);
    let values = fixture.add_vec3(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
    fixture.add_animation(json!({
        "name": "walk",
        "samplers": [{ "input": times, "output": values, "interpolation": "LINEAR" }],
        "channels": [{ "sampler": 0, "target": { "node": 2, "path": "translation" } }]
    }));

    fixture
}
