//! Import Settings
//!
//! Configuration consumed once per model load.
//!
//! ```rust,ignore
//! use rigplay::assets::{ImportFlags, ImportSettings};
//!
//! // Defaults: triangulate, flip V, keep at most four weights per vertex.
//! let settings = ImportSettings::default();
//!
//! // From a JSON config; omitted fields keep their defaults.
//! let settings = ImportSettings::from_json_str(r#"{ "flags": "TRIANGULATE | FLIP_UVS" }"#)?;
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Post-processing applied by the importer before the core sees the scene.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ImportFlags: u32 {
        /// Convert strips and fans to triangle lists.
        const TRIANGULATE        = 1 << 0;
        /// Flip the V axis of texture coordinates.
        const FLIP_UVS           = 1 << 1;
        /// Keep only the four strongest influences per vertex, renormalised.
        const LIMIT_BONE_WEIGHTS = 1 << 2;
    }
}

impl Default for ImportFlags {
    fn default() -> Self {
        Self::TRIANGULATE | Self::FLIP_UVS | Self::LIMIT_BONE_WEIGHTS
    }
}

/// Configuration for a single model import.
///
/// | Field             | Description                                  | Default              |
/// |-------------------|----------------------------------------------|----------------------|
/// | `flags`           | Importer post-processing                     | all [`ImportFlags`]  |
/// | `diffuse_uniform` | Uniform name for base-colour textures        | `"texture_diffuse"`  |
/// | `normal_uniform`  | Uniform name for normal maps                 | `"texture_normal"`   |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub flags: ImportFlags,
    pub diffuse_uniform: String,
    pub normal_uniform: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            flags: ImportFlags::default(),
            diffuse_uniform: "texture_diffuse".to_string(),
            normal_uniform: "texture_normal".to_string(),
        }
    }
}

impl ImportSettings {
    /// Parses settings from JSON. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[inline]
    #[must_use]
    pub fn has(&self, flag: ImportFlags) -> bool {
        self.flags.contains(flag)
    }
}
