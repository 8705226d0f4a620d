//! YAML manifest reader.
//!
//! # Format
//!
//! ```yaml
//! # top-level keys are defaults inherited by every application
//! memory: 256M
//! env:
//!   RAILS_ENV: production
//!
//! applications:
//! - name: web
//!   path: ./web            # relative to the manifest's directory
//!   instances: 2
//!   host: www
//!   domain: example.com
//!   services: [db]
//! - name: worker
//!   command: bin/worker    # `null` or `default` resets to the buildpack's
//!   no-route: true
//! ```
//!
//! Quantities (`memory`, `disk_quota`) are strings with a unit (`512M`,
//! `1G`) or bare integers meaning megabytes. `env` maps are merged with the
//! defaults key by key; every other key replaces the default.

use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use tracing::{debug, instrument};

use hoist_core::{
    application::{ManifestError, ports::{Manifest, ManifestRepository}},
    domain::{ApplicationParameters, DomainError, DomainValidator},
};

/// Looked up in order when the manifest path is a directory.
pub const MANIFEST_FILE_NAMES: &[&str] = &["manifest.yml", "manifest.yaml"];

const APPLICATIONS_KEY: &str = "applications";
const ENV_KEY: &str = "env";

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlManifestRepository;

impl YamlManifestRepository {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestRepository for YamlManifestRepository {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn read_manifest(&self, path: &Path) -> Result<Manifest, ManifestError> {
        let path = locate(path)?;
        let text = fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ManifestError::NotFound { path: path.clone() },
            _ => ManifestError::Io {
                path: path.clone(),
                reason: err.to_string(),
            },
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        let applications = parse(&text, &base_dir).map_err(|reason| ManifestError::Invalid {
            path: path.clone(),
            reason,
        })?;

        debug!(apps = applications.len(), "Manifest parsed");
        Ok(Manifest { path, applications })
    }
}

fn locate(path: &Path) -> Result<PathBuf, ManifestError> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    MANIFEST_FILE_NAMES
        .iter()
        .map(|name| path.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ManifestError::NotFound {
            path: path.join(MANIFEST_FILE_NAMES[0]),
        })
}

// ── Parsing ──────────────────────────────────────────────────────────────────

fn parse(text: &str, base_dir: &Path) -> Result<Vec<ApplicationParameters>, String> {
    let document: Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    let mut root = match document {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        _ => return Err("expected a mapping at the top level".into()),
    };

    let entries = match root.remove(APPLICATIONS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => return Err(format!("'{APPLICATIONS_KEY}' must be a list")),
    };
    let defaults = root;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let Value::Mapping(entry) = entry else {
                return Err(format!("application #{} is not a mapping", index + 1));
            };
            let merged = inherit(&defaults, entry);
            let raw: RawApp = serde_yaml::from_value(Value::Mapping(merged))
                .map_err(|e| format!("application #{}: {e}", index + 1))?;
            raw.into_params(base_dir)
                .map_err(|e| format!("application #{}: {e}", index + 1))
        })
        .collect()
}

/// Lay `entry` over `defaults`. `env` maps are merged key by key.
fn inherit(defaults: &Mapping, mut entry: Mapping) -> Mapping {
    let mut merged = defaults.clone();

    if let (Some(Value::Mapping(base_env)), Some(Value::Mapping(app_env))) =
        (defaults.get(ENV_KEY), entry.get(ENV_KEY))
    {
        let mut env = base_env.clone();
        for (key, value) in app_env {
            env.insert(key.clone(), value.clone());
        }
        entry.insert(Value::from(ENV_KEY), Value::Mapping(env));
    }

    for (key, value) in entry {
        merged.insert(key, value);
    }
    merged
}

/// One `applications:` entry as written.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApp {
    name: Option<String>,
    path: Option<PathBuf>,
    memory: Option<Quantity>,
    #[serde(alias = "disk-quota")]
    disk_quota: Option<Quantity>,
    instances: Option<i64>,
    #[serde(default, deserialize_with = "resettable")]
    buildpack: Option<Option<String>>,
    #[serde(default, deserialize_with = "resettable")]
    command: Option<Option<String>>,
    stack: Option<String>,
    host: Option<String>,
    domain: Option<String>,
    #[serde(rename = "no-route", alias = "no_route")]
    no_route: Option<bool>,
    #[serde(rename = "random-route", alias = "random_route")]
    random_route: Option<bool>,
    timeout: Option<Scalar>,
    services: Option<Vec<String>>,
    env: Option<BTreeMap<String, Scalar>>,
}

impl RawApp {
    fn into_params(self, base_dir: &Path) -> Result<ApplicationParameters, DomainError> {
        Ok(ApplicationParameters {
            name: self.name,
            path: self.path.map(|p| if p.is_absolute() { p } else { base_dir.join(p) }),
            memory: self.memory.map(Quantity::megabytes).transpose()?,
            disk_quota: self.disk_quota.map(Quantity::megabytes).transpose()?,
            instance_count: self.instances.map(DomainValidator::instance_count).transpose()?,
            buildpack_url: self.buildpack.map(reset_value),
            command: self.command.map(reset_value),
            stack_name: self.stack,
            host: self.host,
            domain: self.domain,
            no_route: self.no_route,
            use_random_hostname: self.random_route,
            health_check_timeout: self
                .timeout
                .map(|t| DomainValidator::timeout_seconds(&t.into_string()))
                .transpose()?,
            services_to_bind: self.services,
            environment_vars: self.env.map(|env| {
                env.into_iter()
                    .map(|(key, value)| (key, value.into_string()))
                    .collect()
            }),
            ..ApplicationParameters::default()
        })
    }
}

/// `null` → reset; `"null"` / `"default"` → reset; anything else verbatim.
fn reset_value(value: Option<String>) -> String {
    value
        .map(|v| DomainValidator::resettable(&v))
        .unwrap_or_default()
}

/// Distinguishes an explicit `null` from an absent key.
fn resettable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Quantity {
    Megabytes(u64),
    Text(String),
}

impl Quantity {
    fn megabytes(self) -> Result<u64, DomainError> {
        match self {
            Self::Megabytes(mb) => Ok(mb),
            Self::Text(text) => DomainValidator::megabytes(&text),
        }
    }
}

/// A YAML scalar read as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}
