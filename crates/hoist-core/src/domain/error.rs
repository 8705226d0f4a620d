// ============================================================================
// domain/error.rs - USAGE AND VALIDATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Everything here is raised before any remote call is made:
/// - Cloneable (cheap to carry through reporting)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Invocation Errors (400-level equivalent)
    // ========================================================================
    #[error("App name is a required field")]
    MissingName,

    #[error(
        "Command line flags (except -f and -p) cannot be applied when pushing multiple apps from a manifest file"
    )]
    ConflictingFlags,

    #[error("A path (-p) needs an app name when the manifest lists several apps")]
    PathWithoutSelection,

    #[error("Invalid instance count: {count}. Instance count must be a positive integer")]
    InvalidInstanceCount { count: i64 },

    #[error("Invalid byte quantity '{input}': expected a number with a unit of T, G, M or K")]
    InvalidByteQuantity { input: String },

    #[error("Invalid timeout param: '{input}'")]
    InvalidTimeout { input: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Could not find app named '{name}' in manifest")]
    AppNotFoundInManifest { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingName => vec![
                "Pass the app name as the first argument: hoist push APP".into(),
                "Or add a 'name' to the application entry in your manifest".into(),
            ],
            Self::ConflictingFlags => vec![
                "Select a single app from the manifest: hoist push APP [flags]".into(),
                "Or move the overrides into the manifest file".into(),
            ],
            Self::PathWithoutSelection => vec![
                "Name the app the path belongs to: hoist push APP -p PATH".into(),
                "Or set 'path' on each application entry in the manifest".into(),
            ],
            Self::InvalidInstanceCount { .. } => vec!["Use -i with a value of 1 or more".into()],
            Self::InvalidByteQuantity { .. } => vec![
                "Quantities need a unit suffix".into(),
                "Examples: 256M, 1024M, 1G".into(),
            ],
            Self::InvalidTimeout { .. } => {
                vec!["The start timeout is a whole number of seconds, e.g. -t 120".into()]
            }
            Self::AppNotFoundInManifest { name } => vec![
                format!("No entry in the manifest has name '{name}'"),
                "Check the spelling, or push every app by omitting the name".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AppNotFoundInManifest { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Usage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    NotFound,
}
