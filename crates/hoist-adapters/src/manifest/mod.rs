//! Manifest adapters.

mod yaml;

pub use yaml::{MANIFEST_FILE_NAMES, YamlManifestRepository};
