pub mod gltf;

pub use self::gltf::GltfImporter;
