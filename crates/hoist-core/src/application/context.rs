//! The targeted organization, space, and user for one invocation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationFields {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceFields {
    pub guid: String,
    pub name: String,
}

/// Read-only for the whole push. Routes and apps are created in `space`;
/// domains are looked up in `organization`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetContext {
    pub organization: OrganizationFields,
    pub space: SpaceFields,
    pub username: String,
}

impl TargetContext {
    pub fn new(
        organization: OrganizationFields,
        space: SpaceFields,
        username: impl Into<String>,
    ) -> Self {
        Self {
            organization,
            space,
            username: username.into(),
        }
    }
}
