//! Remote application state as reconciled during a push.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::route::Route, value_objects::AppState};

/// A read-mostly local copy of the platform's application record.
///
/// Fetched or created once per push and threaded through that push's
/// pipeline; never cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub state: AppState,
    pub instances: u32,
    /// Memory limit in megabytes.
    pub memory: u64,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub environment_vars: BTreeMap<String, String>,
}

impl Application {
    /// Whether `route` is already bound to this application.
    pub fn has_route(&self, route: &Route) -> bool {
        self.routes.iter().any(|bound| bound.guid == route.guid)
    }
}
