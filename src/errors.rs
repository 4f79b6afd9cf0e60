//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! Failures fall into two separate kinds so callers can treat them differently:
//! - [`ImportError`]: the asset could not be turned into a [`Model`](crate::Model).
//!   Raised by the scene importer and the mesh assembler. A failed load never
//!   yields a partial model.
//! - [`InvariantViolation`]: keyframe data produced an interpolation factor that
//!   cannot come from well-formed, time-ordered keys. Raised by animation
//!   evaluation.
//!
//! [`RigError`] wraps both for callers that do not care about the distinction.
//!
//! ```rust,ignore
//! use rigplay::{Model, errors::Result};
//!
//! fn first_pose(path: &str) -> Result<Vec<glam::Mat4>> {
//!     let model = Model::load(path)?;
//!     Ok(model.evaluate(0.0)?)
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::animation::tracks::KeyframeRangeError;

/// Boxed source error of an unreadable asset.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal failure while importing or assembling a model.
///
/// Every variant carries the path of the asset being loaded so the message is
/// actionable on its own.
#[derive(Error, Debug)]
pub enum ImportError {
    // ========================================================================
    // Parsing
    // ========================================================================
    /// The file could not be read or parsed by the scene importer.
    #[error("Could not load model from {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    /// The scene parsed but contains no meshes.
    #[error("Could not load model from {}: the scene has no meshes", .path.display())]
    NoMeshes { path: PathBuf },

    // ========================================================================
    // Vertex attributes
    // ========================================================================
    /// A mesh has no vertex positions.
    #[error("Mesh '{mesh}' in {} does not have vertex positions", .path.display())]
    MissingPositions { path: PathBuf, mesh: String },

    /// A mesh has no vertex normals.
    #[error("Mesh '{mesh}' in {} does not have normals", .path.display())]
    MissingNormals { path: PathBuf, mesh: String },

    /// Positions and normals disagree on the vertex count.
    #[error(
        "Mesh '{mesh}' in {} has {positions} positions but {normals} normals",
        .path.display()
    )]
    AttributeCountMismatch {
        path: PathBuf,
        mesh: String,
        positions: usize,
        normals: usize,
    },

    // ========================================================================
    // Topology
    // ========================================================================
    /// A face does not have exactly three indices.
    #[error(
        "Face {face} of mesh '{mesh}' in {} has {indices} indices, expected exactly 3",
        .path.display()
    )]
    NonTriangularFace {
        path: PathBuf,
        mesh: String,
        face: usize,
        indices: usize,
    },

    /// A face references a vertex the mesh does not have.
    #[error(
        "Mesh '{mesh}' in {} references vertex {index} but only has {vertex_count} vertices",
        .path.display()
    )]
    IndexOutOfRange {
        path: PathBuf,
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    // ========================================================================
    // Skinning
    // ========================================================================
    /// A bone weight targets a vertex the mesh does not have.
    #[error(
        "Bone '{bone}' of mesh '{mesh}' in {} weights vertex {vertex_id} but the mesh only has {vertex_count} vertices",
        .path.display()
    )]
    BoneWeightOutOfRange {
        path: PathBuf,
        mesh: String,
        bone: String,
        vertex_id: u32,
        vertex_count: usize,
    },
}

impl ImportError {
    /// Wraps any parser or I/O error as [`ImportError::Unreadable`].
    pub fn unreadable(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unreadable {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Keyframe data violated an assumption animation evaluation relies on.
///
/// This signals a malformed asset (keys out of time order, duplicated times
/// at a bracket, NaN times) rather than bad caller input, and is never
/// silently clamped away.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// A channel produced an interpolation factor outside `[0, 1]`.
    #[error("Invalid {property} keyframes on node '{node}': {source}")]
    InterpolationFactor {
        node: String,
        property: &'static str,
        #[source]
        source: KeyframeRangeError,
    },
}

/// Any failure the crate can report.
#[derive(Error, Debug)]
pub enum RigError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
