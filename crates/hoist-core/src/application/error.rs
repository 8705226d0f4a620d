//! Application layer errors.
//!
//! These errors represent failures while talking to the platform or reading
//! a manifest. Invocation mistakes caught before any remote call are
//! `DomainError` from `crate::domain`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorCategory;

// ── Platform errors ──────────────────────────────────────────────────────────

/// Kind of remote entity a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    App,
    Route,
    Domain,
    Stack,
    ServiceInstance,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::App => "App",
            Self::Route => "Route",
            Self::Domain => "Domain",
            Self::Stack => "Stack",
            Self::ServiceInstance => "Service instance",
        })
    }
}

/// Platform error codes the push flow reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// The route belongs to another space or is otherwise not bindable.
    InvalidRelation,
    /// The service instance is already bound to the application.
    AppAlreadyBound,
    Other(String),
}

impl ErrorCode {
    pub const INVALID_RELATION: &'static str = "1002";
    pub const APP_ALREADY_BOUND: &'static str = "90003";

    pub fn from_code(code: &str) -> Self {
        match code {
            Self::INVALID_RELATION => Self::InvalidRelation,
            Self::APP_ALREADY_BOUND => Self::AppAlreadyBound,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidRelation => Self::INVALID_RELATION,
            Self::AppAlreadyBound => Self::APP_ALREADY_BOUND,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a platform port can report.
///
/// "Not found" is its own variant because most lookups treat it as a
/// signal to create rather than as a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("{kind} {name} not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("Server error, status code: {status}, error code: {code}, message: {message}")]
    Http {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    #[error("{0}")]
    Transport(String),
}

impl PlatformError {
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn http(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            code: ErrorCode::from_code(code),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The platform error code, if the platform answered with one.
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Http { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

// ── Manifest errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Manifest file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading manifest file {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Error reading manifest file {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
}

impl ManifestError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Application errors ───────────────────────────────────────────────────────

/// Errors that occur while orchestrating a push.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("No default domain exists")]
    NoDefaultDomain,

    #[error("The route {url} is already in use")]
    RouteTaken { url: String },

    #[error("Could not find service {service} to bind to {app}")]
    ServiceNotFound { service: String, app: String },

    /// A remote call failed; `operation` names what was being attempted.
    #[error("Failed to {operation}: {source}")]
    Platform {
        operation: String,
        #[source]
        source: PlatformError,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl ApplicationError {
    pub fn platform(operation: impl Into<String>, source: PlatformError) -> Self {
        Self::Platform {
            operation: operation.into(),
            source,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoDefaultDomain => vec![
                "Create a domain for your organization, or ask an admin for a shared one".into(),
                "Or push with --no-route".into(),
            ],
            Self::RouteTaken { .. } => vec![
                "Change the hostname with -n HOSTNAME".into(),
                "Or use --random-route to generate a unique hostname".into(),
            ],
            Self::ServiceNotFound { service, .. } => vec![
                format!("Create the service instance '{service}' first"),
                "Or remove it from the manifest's services list".into(),
            ],
            Self::Platform { source, .. } => match source {
                PlatformError::Transport(_) => vec![
                    "Check your network connection and the platform endpoint".into(),
                ],
                _ => vec!["Check the error details above".into()],
            },
            Self::Manifest(ManifestError::NotFound { .. }) => vec![
                "Pass the manifest path with -f, or push without one using --no-manifest".into(),
            ],
            Self::Manifest(_) => vec!["Check the manifest is valid YAML".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoDefaultDomain | Self::ServiceNotFound { .. } => ErrorCategory::NotFound,
            Self::RouteTaken { .. } => ErrorCategory::Conflict,
            Self::Platform { source, .. } if source.is_not_found() => ErrorCategory::NotFound,
            Self::Platform { .. } => ErrorCategory::Remote,
            Self::Manifest(ManifestError::NotFound { .. }) => ErrorCategory::NotFound,
            Self::Manifest(_) => ErrorCategory::Configuration,
        }
    }
}
