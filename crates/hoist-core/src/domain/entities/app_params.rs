//! Desired configuration for one application push.
//!
//! `ApplicationParameters` is deliberately sparse: every field is optional
//! because "absent" and "explicitly empty" mean different things. An absent
//! start command leaves the remote value alone, while `Some("")` resets it to
//! the buildpack default.
//!
//! # Domain purity
//!
//! This module must not import `tracing`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::error::DomainError;

/// A sparse, optional-valued description of one application's desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationParameters {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    /// Memory limit in megabytes.
    pub memory: Option<u64>,
    /// Disk quota in megabytes.
    pub disk_quota: Option<u64>,
    pub instance_count: Option<u32>,
    pub buildpack_url: Option<String>,
    pub command: Option<String>,
    pub stack_name: Option<String>,
    /// Resolved from `stack_name` during the push; never user supplied.
    pub stack_guid: Option<String>,
    /// Attached when the application is created.
    pub space_guid: Option<String>,
    pub host: Option<String>,
    pub domain: Option<String>,
    pub no_route: Option<bool>,
    pub use_random_hostname: Option<bool>,
    /// Start timeout in seconds.
    pub health_check_timeout: Option<u32>,
    pub services_to_bind: Option<Vec<String>>,
    pub environment_vars: Option<BTreeMap<String, String>>,
}

impl ApplicationParameters {
    /// Parameters naming a single app and nothing else.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The app name, or [`DomainError::MissingName`].
    pub fn require_name(&self) -> Result<&str, DomainError> {
        self.name.as_deref().ok_or(DomainError::MissingName)
    }

    pub fn no_route(&self) -> bool {
        self.no_route.unwrap_or(false)
    }

    pub fn use_random_hostname(&self) -> bool {
        self.use_random_hostname.unwrap_or(false)
    }

    /// Lay every field that is present in `overrides` on top of `self`.
    ///
    /// Absent override fields keep the current value. Collections are
    /// replaced wholesale rather than merged element-wise.
    pub fn merge(&mut self, overrides: &ApplicationParameters) {
        overlay(&mut self.name, &overrides.name);
        overlay(&mut self.path, &overrides.path);
        overlay(&mut self.memory, &overrides.memory);
        overlay(&mut self.disk_quota, &overrides.disk_quota);
        overlay(&mut self.instance_count, &overrides.instance_count);
        overlay(&mut self.buildpack_url, &overrides.buildpack_url);
        overlay(&mut self.command, &overrides.command);
        overlay(&mut self.stack_name, &overrides.stack_name);
        overlay(&mut self.stack_guid, &overrides.stack_guid);
        overlay(&mut self.space_guid, &overrides.space_guid);
        overlay(&mut self.host, &overrides.host);
        overlay(&mut self.domain, &overrides.domain);
        overlay(&mut self.no_route, &overrides.no_route);
        overlay(&mut self.use_random_hostname, &overrides.use_random_hostname);
        overlay(&mut self.health_check_timeout, &overrides.health_check_timeout);
        overlay(&mut self.services_to_bind, &overrides.services_to_bind);
        overlay(&mut self.environment_vars, &overrides.environment_vars);
    }

    /// Whether any field other than `name` and `path` is present.
    ///
    /// Multi-app manifests only accept app selection and a path from the
    /// command line; anything else makes the invocation ambiguous.
    pub fn has_overrides(&self) -> bool {
        let Self {
            name: _,
            path: _,
            memory,
            disk_quota,
            instance_count,
            buildpack_url,
            command,
            stack_name,
            stack_guid,
            space_guid,
            host,
            domain,
            no_route,
            use_random_hostname,
            health_check_timeout,
            services_to_bind,
            environment_vars,
        } = self;

        memory.is_some()
            || disk_quota.is_some()
            || instance_count.is_some()
            || buildpack_url.is_some()
            || command.is_some()
            || stack_name.is_some()
            || stack_guid.is_some()
            || space_guid.is_some()
            || host.is_some()
            || domain.is_some()
            || no_route.is_some()
            || use_random_hostname.is_some()
            || health_check_timeout.is_some()
            || services_to_bind.is_some()
            || environment_vars.is_some()
    }

    /// Copy every variable of `existing` that the incoming override map
    /// does not mention, so an update never drops variables silently.
    ///
    /// When no override map is present the update leaves the remote
    /// environment untouched and nothing needs copying.
    pub fn preserve_environment(&mut self, existing: &BTreeMap<String, String>) {
        if let Some(incoming) = self.environment_vars.as_mut() {
            for (key, value) in existing {
                incoming
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }
    }
}

fn overlay<T: Clone>(base: &mut Option<T>, top: &Option<T>) {
    if let Some(value) = top {
        *base = Some(value.clone());
    }
}
