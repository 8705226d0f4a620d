use std::{
    collections::BTreeMap,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

/// Per-directory file listing names to leave out, one per line.
pub const IGNORE_FILE: &str = ".hoistignore";

const DEFAULT_IGNORES: &[&str] = &[
    IGNORE_FILE,
    "_darcs",
    ".DS_Store",
    ".git",
    ".gitignore",
    ".hg",
    ".svn",
    "manifest.yml",
    "manifest.yaml",
];

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("App path {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One uploadable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFingerprint {
    /// Relative to the app root, `/`-separated.
    pub path: String,
    pub sha256: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ArtifactScanner {
    ignores: Vec<String>,
}

impl Default for ArtifactScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactScanner {
    pub fn new() -> Self {
        Self {
            ignores: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Fingerprint every uploadable file under `root`, sorted by path.
    ///
    /// A file `root` is a single-file app.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn scan(&self, root: &Path) -> Result<Vec<FileFingerprint>, ArtifactError> {
        if !root.exists() {
            return Err(ArtifactError::Missing {
                path: root.to_path_buf(),
            });
        }

        if root.is_file() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Ok(vec![fingerprint(root, name)?]);
        }

        let mut ignores = self.ignores.clone();
        ignores.extend(read_ignore_file(root)?);

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry, root, &ignores));

        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                ArtifactError::Io {
                    path,
                    source: io::Error::other(err.to_string()),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            files.push(fingerprint(entry.path(), relative(entry.path(), root))?);
        }

        debug!(files = files.len(), "App files scanned");
        Ok(files)
    }
}

/// Difference between the last upload and the files on disk now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChanges<'a> {
    /// New or modified files.
    pub upload: Vec<&'a FileFingerprint>,
    /// Paths uploaded last time that no longer exist.
    pub removed: Vec<String>,
}

impl FileChanges<'_> {
    /// A removed file counts as a change: the platform copy must go too.
    pub fn file_count(&self) -> u64 {
        (self.upload.len() + self.removed.len()) as u64
    }

    pub fn bytes(&self) -> u64 {
        self.upload.iter().map(|file| file.size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }
}

/// Compare `current` against the `previous` path → sha256 map.
pub fn changed_files<'a>(
    previous: &BTreeMap<String, String>,
    current: &'a [FileFingerprint],
) -> FileChanges<'a> {
    let upload = current
        .iter()
        .filter(|file| previous.get(&file.path) != Some(&file.sha256))
        .collect();
    let removed = previous
        .keys()
        .filter(|path| !current.iter().any(|file| &file.path == *path))
        .cloned()
        .collect();
    FileChanges { upload, removed }
}

fn read_ignore_file(root: &Path) -> Result<Vec<String>, ArtifactError> {
    let path = root.join(IGNORE_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.trim_end_matches('/').to_string())
            .collect()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(ArtifactError::Io { path, source }),
    }
}

fn is_ignored(entry: &DirEntry, root: &Path, ignores: &[String]) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    let rel = relative(entry.path(), root);
    ignores
        .iter()
        .any(|pattern| *pattern == name || *pattern == rel)
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn fingerprint(path: &Path, rel: String) -> Result<FileFingerprint, ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut size = 0u64;
    loop {
        let read = file.read(&mut buffer).map_err(io_err)?;
        if read == 0 {
            break;
        }
        size += read as u64;
        hasher.update(&buffer[..read]);
    }

    Ok(FileFingerprint {
        path: rel,
        sha256: hex::encode(hasher.finalize()),
        size,
    })
}
