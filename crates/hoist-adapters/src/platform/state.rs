//! Serializable records behind the local platform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hoist_core::domain::{
    AppState, Application, ApplicationParameters, Domain, Route, ServiceInstance, Stack,
};

/// Memory given to apps created without a memory setting, in megabytes.
pub const DEFAULT_MEMORY_MB: u64 = 1024;

/// Everything the local platform knows. Persisted as a JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformState {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
    #[serde(default)]
    pub stacks: Vec<Stack>,
    #[serde(default)]
    pub service_instances: Vec<ServiceInstance>,
    #[serde(default)]
    pub service_bindings: Vec<ServiceBinding>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub apps: Vec<AppRecord>,
}

/// A domain plus the organization owning it. Shared domains have no owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(flatten)]
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owning_org_guid: Option<String>,
}

impl DomainRecord {
    pub fn visible_to(&self, org_guid: &str) -> bool {
        self.domain.shared || self.owning_org_guid.as_deref() == Some(org_guid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub app_guid: String,
    pub service_instance_guid: String,
}

/// The platform's full view of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    #[serde(default)]
    pub state: AppState,
    pub instances: u32,
    pub memory: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_quota: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildpack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_timeout: Option<u32>,
    #[serde(default)]
    pub environment_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub route_guids: Vec<String>,
    /// Relative path → sha256 of the last uploaded bits.
    #[serde(default)]
    pub uploaded_files: BTreeMap<String, String>,
}

impl AppRecord {
    pub fn new(guid: String, name: String, space_guid: String) -> Self {
        Self {
            guid,
            name,
            space_guid,
            state: AppState::Stopped,
            instances: 1,
            memory: DEFAULT_MEMORY_MB,
            disk_quota: None,
            buildpack: None,
            command: None,
            stack_guid: None,
            health_check_timeout: None,
            environment_vars: BTreeMap::new(),
            route_guids: Vec::new(),
            uploaded_files: BTreeMap::new(),
        }
    }

    /// Apply every field present in `params`. An empty buildpack or command
    /// resets it.
    pub fn apply(&mut self, params: &ApplicationParameters) {
        if let Some(name) = &params.name {
            self.name.clone_from(name);
        }
        if let Some(instances) = params.instance_count {
            self.instances = instances;
        }
        if let Some(memory) = params.memory {
            self.memory = memory;
        }
        if let Some(disk) = params.disk_quota {
            self.disk_quota = Some(disk);
        }
        if let Some(buildpack) = &params.buildpack_url {
            self.buildpack = non_empty(buildpack);
        }
        if let Some(command) = &params.command {
            self.command = non_empty(command);
        }
        if let Some(stack_guid) = &params.stack_guid {
            self.stack_guid = Some(stack_guid.clone());
        }
        if let Some(timeout) = params.health_check_timeout {
            self.health_check_timeout = Some(timeout);
        }
        if let Some(env) = &params.environment_vars {
            self.environment_vars.clone_from(env);
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl PlatformState {
    pub fn app(&self, guid: &str) -> Option<&AppRecord> {
        self.apps.iter().find(|app| app.guid == guid)
    }

    pub fn app_mut(&mut self, guid: &str) -> Option<&mut AppRecord> {
        self.apps.iter_mut().find(|app| app.guid == guid)
    }

    /// First app called `name`; inside `space_guid` when one is given.
    pub fn app_named(&self, name: &str, space_guid: Option<&str>) -> Option<&AppRecord> {
        self.apps.iter().find(|app| {
            app.name == name && space_guid.is_none_or(|space| app.space_guid == space)
        })
    }

    pub fn route(&self, guid: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.guid == guid)
    }

    pub fn domain(&self, guid: &str) -> Option<&Domain> {
        self.domains
            .iter()
            .map(|record| &record.domain)
            .find(|domain| domain.guid == guid)
    }

    /// Domains `org_guid` may route through, in insertion order.
    pub fn domains_for_org<'s>(&'s self, org_guid: &'s str) -> impl Iterator<Item = &'s Domain> {
        self.domains
            .iter()
            .filter(move |record| record.visible_to(org_guid))
            .map(|record| &record.domain)
    }

    /// The record as the push pipeline sees it, routes resolved.
    pub fn to_application(&self, record: &AppRecord) -> Application {
        Application {
            guid: record.guid.clone(),
            name: record.name.clone(),
            state: record.state,
            instances: record.instances,
            memory: record.memory,
            routes: record
                .route_guids
                .iter()
                .filter_map(|guid| self.route(guid).cloned())
                .collect(),
            environment_vars: record.environment_vars.clone(),
        }
    }
}
