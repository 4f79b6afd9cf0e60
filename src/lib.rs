#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod model;
pub mod render;
pub mod resources;
pub mod scene;

pub use animation::{AnimationClip, KeyframeTrack, NodeChannel, PoseEvaluator};
pub use assets::{GltfImporter, ImportFlags, ImportSettings, ImportedScene, SceneImporter};
pub use errors::{ImportError, InvariantViolation, RigError};
pub use model::Model;
pub use render::{DrawCommand, GeometryUploader, VertexLayout};
pub use resources::{AnimatedVertex, Mesh, TextureBinding, TextureSource, Vertex, VertexData};
pub use scene::{Bone, BoneTable, Node, NodeIndex, NodeTree};
