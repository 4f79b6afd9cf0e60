//! Asset import
//!
//! Importers translate a file into an [`ImportedScene`], the neutral form the
//! rest of the crate consumes.

pub mod imported;
pub mod loaders;
pub mod settings;

use std::path::Path;

use crate::errors::ImportError;

pub use imported::{
    Face, ImportedBone, ImportedMaterial, ImportedMesh, ImportedScene, VertexWeight,
};
pub use loaders::GltfImporter;
pub use settings::{ImportFlags, ImportSettings};

/// Parses a scene file into its neutral in-memory form.
///
/// Implementations report parser diagnostics through `log` and fail only
/// when the file cannot be read at all. Structural validation (meshes,
/// attributes) happens afterwards in [`ImportedScene::validate`].
pub trait SceneImporter {
    fn import(&self, path: &Path, settings: &ImportSettings) -> Result<ImportedScene, ImportError>;
}
