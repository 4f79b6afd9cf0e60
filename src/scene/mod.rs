//! Scene hierarchy
//!
//! - [`NodeTree`]: arena of imported nodes addressed by [`NodeIndex`]
//! - [`BoneTable`]: bone names mapped to palette indices
//! - [`propagate_mesh_transforms`]: stamps meshes with their owning node

pub mod node;
pub mod skeleton;
pub mod transform_system;

pub use node::{Node, NodeIndex, NodeTree};
pub use skeleton::{Bone, BoneTable};
pub use transform_system::propagate_mesh_transforms;
