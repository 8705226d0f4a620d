//! Infrastructure adapters for Hoist.
//!
//! This crate implements the ports defined in `hoist-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod artifact;
pub mod manifest;
pub mod platform;
pub mod words;

// Re-export commonly used adapters
pub use artifact::ArtifactScanner;
pub use manifest::YamlManifestRepository;
pub use platform::{InMemoryPlatform, PlatformCall, SnapshotError};
pub use words::WordPairGenerator;
