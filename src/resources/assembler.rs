use std::path::Path;

use glam::{Mat4, Vec2};

use crate::assets::imported::{ImportedMesh, ImportedScene};
use crate::errors::ImportError;
use crate::resources::mesh::Mesh;
use crate::resources::vertex::{AnimatedVertex, Index, Vertex, VertexData};

/// Shared vertex and index arrays of a model, plus the per-mesh slices into
/// them.
#[derive(Debug, Clone)]
pub struct AssembledGeometry {
    pub meshes: Vec<Mesh>,
    pub vertices: VertexData,
    pub indices: Vec<Index>,
}

/// Flattens every mesh of `scene` into one vertex array and one triangle
/// array.
///
/// Mesh `i` starts at the running totals of meshes `0..i`. The vertex
/// layout is animated for every mesh when `animated` is set; bone slots are
/// left empty for the bone table to fill. Node names and transforms are left
/// for the hierarchy pass.
pub fn assemble(
    path: &Path,
    scene: &ImportedScene,
    animated: bool,
) -> Result<AssembledGeometry, ImportError> {
    let total_vertices: usize = scene.meshes.iter().map(ImportedMesh::vertex_count).sum();
    let total_faces: usize = scene.meshes.iter().map(|m| m.faces.len()).sum();

    let mut meshes = Vec::with_capacity(scene.meshes.len());
    let mut vertices = Vec::with_capacity(total_vertices);
    let mut indices = Vec::with_capacity(total_faces);

    for source in &scene.meshes {
        let base_vertex = vertices.len() as u32;
        let base_index = indices.len() as u32;

        append_vertices(path, source, &mut vertices)?;
        append_triangles(path, source, &mut indices)?;

        let textures = source
            .material_index
            .and_then(|index| scene.materials.get(index))
            .map(|material| material.textures.clone())
            .unwrap_or_default();

        meshes.push(Mesh {
            name: source.name.clone(),
            base_vertex,
            base_index,
            vertex_count: vertices.len() as u32 - base_vertex,
            triangle_count: indices.len() as u32 - base_index,
            material_index: source.material_index,
            node_name: String::new(),
            transform: Mat4::IDENTITY,
            textures,
        });
    }

    let vertices = if animated {
        VertexData::Animated(vertices.into_iter().map(AnimatedVertex::new).collect())
    } else {
        VertexData::Static(vertices)
    };

    log::debug!(
        "{}: assembled {} meshes, {} vertices, {} triangles ({} layout)",
        path.display(),
        meshes.len(),
        vertices.len(),
        indices.len(),
        if animated { "animated" } else { "static" }
    );

    Ok(AssembledGeometry {
        meshes,
        vertices,
        indices,
    })
}

fn append_vertices(
    path: &Path,
    mesh: &ImportedMesh,
    out: &mut Vec<Vertex>,
) -> Result<(), ImportError> {
    let (positions, normals) = mesh.required_attributes(path)?;
    let tex_coords = mesh.tex_coords.as_deref().unwrap_or_default();

    out.extend(
        positions
            .iter()
            .zip(normals)
            .enumerate()
            .map(|(i, (&position, &normal))| Vertex {
                position,
                normal,
                tex_coord: tex_coords.get(i).copied().unwrap_or(Vec2::ZERO),
            }),
    );
    Ok(())
}

fn append_triangles(
    path: &Path,
    mesh: &ImportedMesh,
    out: &mut Vec<Index>,
) -> Result<(), ImportError> {
    let vertex_count = mesh.vertex_count();

    for (face_index, face) in mesh.faces.iter().enumerate() {
        let &[a, b, c] = face.as_slice() else {
            return Err(ImportError::NonTriangularFace {
                path: path.to_path_buf(),
                mesh: mesh.name.clone(),
                face: face_index,
                indices: face.len(),
            });
        };

        if let Some(&index) = [a, b, c].iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ImportError::IndexOutOfRange {
                path: path.to_path_buf(),
                mesh: mesh.name.clone(),
                index,
                vertex_count,
            });
        }

        out.push([a, b, c]);
    }
    Ok(())
}
