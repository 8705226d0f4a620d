//! The `AppSet`: which applications one invocation pushes, and with what.
//!
//! Built once from the command-line parameters and the manifest entries,
//! then consumed read-only by the push pipeline.

use std::path::Path;

use crate::domain::{entities::ApplicationParameters, error::DomainError};

/// Ordered, immutable list of applications to push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSet {
    apps: Vec<ApplicationParameters>,
}

impl AppSet {
    /// Merge command-line parameters with manifest entries.
    ///
    /// - no manifest entries: the command line describes the only app
    /// - one entry: command-line fields override the entry field by field
    /// - several entries: the command line may only select an app by name
    ///   (and give a path); any other override is [`DomainError::ConflictingFlags`],
    ///   a path with no name is [`DomainError::PathWithoutSelection`]
    ///
    /// Every resulting entry must be named, and entries without a path get
    /// `working_dir`.
    pub fn from_sources(
        cli: ApplicationParameters,
        manifest: Vec<ApplicationParameters>,
        working_dir: &Path,
    ) -> Result<Self, DomainError> {
        let selected = match manifest.len() {
            0 => vec![cli],
            1 => {
                let mut apps = manifest;
                apps[0].merge(&cli);
                apps
            }
            _ => select_from_manifest(cli, manifest)?,
        };

        let apps = selected
            .into_iter()
            .map(|app| with_defaults(app, working_dir))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { apps })
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApplicationParameters> {
        self.apps.iter()
    }

    /// Names in push order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().filter_map(|app| app.name.as_deref())
    }
}

impl<'a> IntoIterator for &'a AppSet {
    type Item = &'a ApplicationParameters;
    type IntoIter = std::slice::Iter<'a, ApplicationParameters>;

    fn into_iter(self) -> Self::IntoIter {
        self.apps.iter()
    }
}

fn select_from_manifest(
    cli: ApplicationParameters,
    manifest: Vec<ApplicationParameters>,
) -> Result<Vec<ApplicationParameters>, DomainError> {
    if cli.has_overrides() {
        return Err(DomainError::ConflictingFlags);
    }

    let Some(selected_name) = cli.name else {
        if cli.path.is_some() {
            return Err(DomainError::PathWithoutSelection);
        }
        return Ok(manifest);
    };

    let mut app = manifest
        .into_iter()
        .find(|app| app.name.as_deref() == Some(selected_name.as_str()))
        .ok_or(DomainError::AppNotFoundInManifest {
            name: selected_name,
        })?;

    if cli.path.is_some() {
        app.path = cli.path;
    }
    Ok(vec![app])
}

fn with_defaults(
    mut app: ApplicationParameters,
    working_dir: &Path,
) -> Result<ApplicationParameters, DomainError> {
    app.require_name()?;
    if app.path.is_none() {
        app.path = Some(working_dir.to_path_buf());
    }
    Ok(app)
}
