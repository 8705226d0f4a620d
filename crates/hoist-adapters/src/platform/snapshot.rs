//! JSON persistence so state survives between CLI invocations.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use super::{memory::InMemoryPlatform, state::PlatformState};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to access platform state {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Platform state {path} is not valid: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Platform state is unavailable: {0}")]
    Unavailable(String),
}

impl InMemoryPlatform {
    /// Load a snapshot. A missing file yields an empty platform.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No platform state yet");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let state: PlatformState =
            serde_json::from_str(&text).map_err(|source| SnapshotError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_state(state))
    }

    /// Write the current state, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let io_err = |source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };

        let state = self
            .snapshot()
            .map_err(|err| SnapshotError::Unavailable(err.to_string()))?;
        let json = serde_json::to_string_pretty(&state).map_err(|source| SnapshotError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, json).map_err(io_err)?;
        debug!(path = %path.display(), "Platform state saved");
        Ok(())
    }
}
