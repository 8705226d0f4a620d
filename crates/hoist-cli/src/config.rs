//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the [`TargetContext`]
//! built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `HOIST_<SECTION>__<KEY>`, e.g.
//!    `HOIST_PLATFORM__STATE_FILE`
//! 3. Config file: `--config FILE`, else `config.toml` in the project
//!    config directory (optional)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use hoist_core::application::{OrganizationFields, SpaceFields, TargetContext};

const ENV_PREFIX: &str = "HOIST";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Organization, space and user pushes act on.
    pub target: TargetConfig,
    /// Local platform settings.
    pub platform: PlatformConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub org_guid: String,
    pub org_name: String,
    pub space_guid: String,
    pub space_name: String,
    pub username: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            org_guid: "local-org".into(),
            org_name: "local".into(),
            space_guid: "local-space".into(),
            space_name: "development".into(),
            username: "developer".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Snapshot of the local platform. Empty means the data directory.
    pub state_file: Option<PathBuf>,
    /// Shared domain registered when the platform has no domains yet.
    pub shared_domain: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            shared_domain: "local.hoist.dev".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; the `--output-format` flag wins.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it the default location is read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        config::Config::builder()
            .add_source(
                config::Config::try_from(&Self::default())
                    .context("Failed to build default configuration")?,
            )
            .add_source(config::File::from(path.as_path()).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.hoist.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "hoist", "hoist")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".hoist.toml"))
    }

    /// Where the local platform keeps its state.
    pub fn state_file(&self) -> PathBuf {
        match &self.platform.state_file {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => default_state_file(),
        }
    }

    /// The organization, space and user a push targets.
    pub fn target_context(&self) -> TargetContext {
        let target = &self.target;
        TargetContext::new(
            OrganizationFields {
                guid: target.org_guid.clone(),
                name: target.org_name.clone(),
            },
            SpaceFields {
                guid: target.space_guid.clone(),
                name: target.space_name.clone(),
            },
            target.username.clone(),
        )
    }

    /// Value of a dotted key, as printed by `hoist config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "target.org_guid" => self.target.org_guid.clone(),
            "target.org_name" => self.target.org_name.clone(),
            "target.space_guid" => self.target.space_guid.clone(),
            "target.space_name" => self.target.space_name.clone(),
            "target.username" => self.target.username.clone(),
            "platform.state_file" => self.state_file().display().to_string(),
            "platform.shared_domain" => self.platform.shared_domain.clone(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }
}

fn default_state_file() -> PathBuf {
    directories::ProjectDirs::from("dev", "hoist", "hoist")
        .map(|d| d.data_dir().join("state.json"))
        .unwrap_or_else(|| Path::new(".hoist").join("state.json"))
}
