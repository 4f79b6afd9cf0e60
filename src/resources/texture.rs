use std::path::PathBuf;

/// Where the pixels of a material texture live.
///
/// The core never decodes images; it only tells the renderer which image a
/// mesh samples so the renderer can create and cache the GPU texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureSource {
    /// An external image file, resolved relative to the model file.
    Uri(PathBuf),
    /// An image embedded in the asset, addressed by its image index.
    Embedded { image: usize },
}

/// A texture paired with the shader uniform it should be bound to.
///
/// Slot assignment and binding order are the renderer's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub texture: TextureSource,
    pub uniform_name: String,
}

impl TextureBinding {
    #[must_use]
    pub fn new(texture: TextureSource, uniform_name: impl Into<String>) -> Self {
        Self {
            texture,
            uniform_name: uniform_name.into(),
        }
    }
}
