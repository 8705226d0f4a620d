//! Decides whether a manifest is read, and how a missing one is treated.

use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::{
    application::{
        error::ApplicationError,
        events::{PushEvent, PushReporter},
        ports::ManifestRepository,
    },
    domain::ApplicationParameters,
    error::HoistResult,
};

/// Where the manifest for this invocation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// `--no-manifest`.
    Disabled,
    /// Look in this directory; no manifest there means none at all.
    Discover(PathBuf),
    /// `-f PATH`; must be readable.
    Explicit(PathBuf),
}

pub struct ManifestLoader<'a> {
    manifests: &'a dyn ManifestRepository,
    reporter: &'a dyn PushReporter,
}

impl<'a> ManifestLoader<'a> {
    pub fn new(manifests: &'a dyn ManifestRepository, reporter: &'a dyn PushReporter) -> Self {
        Self {
            manifests,
            reporter,
        }
    }

    /// Application entries of the manifest, empty when there is none.
    #[instrument(skip_all, fields(source = ?source))]
    pub fn load(&self, source: &ManifestSource) -> HoistResult<Vec<ApplicationParameters>> {
        let path = match source {
            ManifestSource::Disabled => return Ok(Vec::new()),
            ManifestSource::Discover(path) | ManifestSource::Explicit(path) => path,
        };

        let manifest = match self.manifests.read_manifest(path) {
            Ok(manifest) => manifest,
            Err(err) if err.is_not_found() && matches!(source, ManifestSource::Discover(_)) => {
                debug!(dir = %path.display(), "No manifest found");
                return Ok(Vec::new());
            }
            Err(err) => return Err(ApplicationError::from(err).into()),
        };

        self.reporter.report(&PushEvent::UsingManifest {
            path: manifest.path.clone(),
        });
        debug!(apps = manifest.applications().len(), "Manifest loaded");
        Ok(manifest.applications)
    }
}
