//! User-facing progress events emitted during a push.
//!
//! Services never print. They hand a [`PushEvent`] to the [`PushReporter`]
//! they were built with, and the driving adapter decides how it looks.

use std::fmt;
use std::path::PathBuf;

use crate::domain::ByteSize;

/// One informational step of a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    UsingManifest {
        path: PathBuf,
    },
    UsingStack {
        name: String,
    },
    CreatingApp {
        name: String,
        org: String,
        space: String,
        user: String,
    },
    UpdatingApp {
        name: String,
        org: String,
        space: String,
        user: String,
    },
    /// `--no-route` on an app without routes.
    WorkerApp {
        name: String,
    },
    RemovingRoute {
        url: String,
    },
    UsingRoute {
        url: String,
    },
    CreatingRoute {
        url: String,
    },
    BindingRoute {
        url: String,
        app: String,
    },
    Uploading {
        app: String,
    },
    UploadingFiles {
        path: PathBuf,
        size: ByteSize,
        file_count: u64,
    },
    NothingChanged,
    BindingService {
        service: String,
        app: String,
        org: String,
        space: String,
        user: String,
    },
    Stopping {
        app: String,
    },
    Starting {
        app: String,
    },
    SkippingStart {
        app: String,
    },
    /// The previous step finished.
    Ok,
}

impl PushEvent {
    /// Non-fatal conditions the user should notice.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NothingChanged)
    }
}

impl fmt::Display for PushEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsingManifest { path } => {
                write!(f, "Using manifest file {}", path.display())
            }
            Self::UsingStack { name } => write!(f, "Using stack {name}..."),
            Self::CreatingApp {
                name,
                org,
                space,
                user,
            } => write!(
                f,
                "Creating app {name} in org {org} / space {space} as {user}..."
            ),
            Self::UpdatingApp {
                name,
                org,
                space,
                user,
            } => write!(
                f,
                "Updating app {name} in org {org} / space {space} as {user}..."
            ),
            Self::WorkerApp { name } => {
                write!(f, "App {name} is a worker, skipping route creation")
            }
            Self::RemovingRoute { url } => write!(f, "Removing route {url}..."),
            Self::UsingRoute { url } => write!(f, "Using route {url}"),
            Self::CreatingRoute { url } => write!(f, "Creating route {url}..."),
            Self::BindingRoute { url, app } => write!(f, "Binding {url} to {app}..."),
            Self::Uploading { app } => write!(f, "Uploading {app}..."),
            Self::UploadingFiles {
                path,
                size,
                file_count,
            } => write!(
                f,
                "Uploading app files from: {}\nUploading {size}, {file_count} files",
                path.display()
            ),
            Self::NothingChanged => f.write_str(
                "None of your application files have changed. Nothing will be uploaded.",
            ),
            Self::BindingService {
                service,
                app,
                org,
                space,
                user,
            } => write!(
                f,
                "Binding service {service} to app {app} in org {org} / space {space} as {user}..."
            ),
            Self::Stopping { app } => write!(f, "Stopping app {app}..."),
            Self::Starting { app } => write!(f, "Starting app {app}..."),
            Self::SkippingStart { app } => {
                write!(f, "Not starting app {app} (--no-start)")
            }
            Self::Ok => f.write_str("OK"),
        }
    }
}

/// Receives push progress. Implemented by the driving adapter.
#[cfg_attr(test, mockall::automock)]
pub trait PushReporter: Send + Sync {
    fn report(&self, event: &PushEvent);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl PushReporter for SilentReporter {
    fn report(&self, _event: &PushEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_summary_uses_short_sizes() {
        let event = PushEvent::UploadingFiles {
            path: PathBuf::from("/srv/web"),
            size: ByteSize::from_bytes(1536),
            file_count: 3,
        };
        assert_eq!(
            event.to_string(),
            "Uploading app files from: /srv/web\nUploading 1.5K, 3 files"
        );
    }

    #[test]
    fn only_nothing_changed_is_a_warning() {
        assert!(PushEvent::NothingChanged.is_warning());
        assert!(!PushEvent::Ok.is_warning());
    }
}
