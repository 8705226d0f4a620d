//! Local application bits.
//!
//! Works out which files under an app path would be uploaded and
//! fingerprints them, so an uploader can skip files the platform already has.

mod scan;

pub use scan::{ArtifactError, ArtifactScanner, FileChanges, FileFingerprint, changed_files};
