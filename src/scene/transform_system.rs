//! Hierarchy pass
//!
//! Walks the node tree once at load time and stamps each mesh with the name
//! of the node that owns it and that node's accumulated bind-pose world
//! transform.

use std::convert::Infallible;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::resources::mesh::Mesh;
use crate::scene::node::{NodeIndex, NodeTree};

/// Writes `node_name` and `transform` onto every mesh a node references.
///
/// A mesh referenced by several nodes keeps the first owner in traversal
/// order. Out-of-range mesh references are logged and skipped.
pub fn propagate_mesh_transforms(path: &Path, nodes: &NodeTree, meshes: &mut [Mesh]) {
    let mut owners: FxHashMap<usize, NodeIndex> = FxHashMap::default();

    let walked = nodes.walk(|index, node, parent_world| {
        let world = parent_world * node.transform;

        for &mesh_index in &node.meshes {
            let Some(mesh) = meshes.get_mut(mesh_index) else {
                log::warn!(
                    "{}: node '{}' references mesh {mesh_index} but the model has {}",
                    path.display(),
                    node.name,
                    meshes.len()
                );
                continue;
            };

            if let Some(&owner) = owners.get(&mesh_index) {
                let owner_name = nodes.get(owner).map_or("", |n| n.name.as_str());
                log::warn!(
                    "{}: mesh '{}' is referenced by node '{owner_name}' and '{}'; keeping '{owner_name}'",
                    path.display(),
                    mesh.name,
                    node.name
                );
                continue;
            }

            owners.insert(mesh_index, index);
            mesh.node_name.clone_from(&node.name);
            mesh.transform = world;
        }

        Ok::<_, Infallible>(world)
    });

    // The visitor is infallible.
    let Ok(()) = walked;

    let orphans = meshes.len() - owners.len();
    if orphans > 0 {
        log::debug!(
            "{}: {orphans} meshes are not referenced by any node",
            path.display()
        );
    }
}
