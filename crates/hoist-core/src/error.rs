//! Unified error handling for Hoist Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions and a category the CLI maps to an
//! exit code.

use thiserror::Error;

use crate::application::error::{ApplicationError, PlatformResult};
use crate::domain::DomainError;

/// Root error type for Hoist Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HoistError {
    /// Invocation errors caught before any remote call.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Failures while orchestrating a push.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl HoistError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in Hoist".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Usage => ErrorCategory::Usage,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    NotFound,
    Conflict,
    Remote,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type HoistResult<T> = Result<T, HoistError>;

/// Extension trait naming the operation a platform call was part of.
pub trait OperationContext<T> {
    /// Wrap a platform failure as "Failed to `operation`: ...".
    fn during(self, operation: impl Into<String>) -> HoistResult<T>;
}

impl<T> OperationContext<T> for PlatformResult<T> {
    fn during(self, operation: impl Into<String>) -> HoistResult<T> {
        self.map_err(|source| ApplicationError::platform(operation, source).into())
    }
}
