//! Errors surfaced by the `hoist` binary and how they reach the terminal.
//!
//! Every failure ends up as a [`CliError`], which knows its exit code,
//! what to suggest to the user, and how to print itself with or without
//! colour.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use hoist_adapters::SnapshotError;
use hoist_core::error::{ErrorCategory as CoreCategory, HoistError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration value is missing or cannot be rendered.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// The local platform state could not be loaded or saved.
    #[error("Platform state error: {0}")]
    PlatformState(#[from] SnapshotError),

    /// A push step failed; the core error carries its own category.
    #[error("Push failed: {0}")]
    Core(#[from] HoistError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// What a failure means to the person at the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    /// A route or name is already held by someone else.
    Conflict,
    Internal,
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { .. } => vec![
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Run 'hoist config list' to see the effective configuration".into(),
            ],
            Self::PlatformState(_) => vec![
                "Point HOIST_PLATFORM__STATE_FILE at a writable location".into(),
                "Delete a corrupt state file to start from an empty platform".into(),
            ],
            Self::Core(err) => err.suggestions(),
            Self::IoError { .. } => vec!["Check that the path exists and is readable".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } | Self::PlatformState(_) => ErrorCategory::Configuration,
            Self::Core(err) => match err.category() {
                CoreCategory::Usage => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Conflict => ErrorCategory::Conflict,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Remote | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// 2 usage, 3 not found, 4 configuration, 5 conflict, 1 anything else.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Conflict => 5,
            ErrorCategory::Internal => 1,
        }
    }

    fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut source = self.source();
        while let Some(err) = source {
            causes.push(err.to_string());
            source = err.source();
        }
        causes
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        let mut out = format!(
            "\n{} {}\n  {}\n",
            "✗".red().bold(),
            "FAILED".red().bold(),
            self.to_string().red()
        );
        if verbose {
            for cause in self.causes() {
                out.push_str(&format!("  {} {}\n", "→".dimmed(), cause.dimmed()));
            }
        }
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }
        if !verbose {
            out.push_str(&format!(
                "\n{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed()
            ));
        }
        out
    }

    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = format!("\nFAILED\n{self}\n");
        if verbose {
            for cause in self.causes() {
                out.push_str(&format!("  Caused by: {cause}\n"));
            }
        }
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }
        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }
        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound | ErrorCategory::Conflict => {
                tracing::warn!(exit_code = self.exit_code(), "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(exit_code = self.exit_code(), "{self}")
            }
        }
        for cause in self.causes() {
            tracing::debug!("Caused by: {cause}");
        }
    }
}

/// Attach a message to a foreign error at the call site.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| CliError::IoError {
            message: f().into(),
            source,
        })
    }
}
