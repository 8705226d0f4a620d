use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS domain routes can be created under.
///
/// `shared` domains belong to the platform; the rest are private to one
/// organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub shared: bool,
}

impl Domain {
    /// URL for `host` under this domain. An empty host maps the bare domain.
    pub fn url_for_host(&self, host: &str) -> String {
        if host.is_empty() {
            self.name.clone()
        } else {
            format!("{host}.{}", self.name)
        }
    }
}

/// A (host, domain) pair directing traffic to applications in one space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub guid: String,
    pub host: String,
    pub domain: Domain,
    pub space_guid: String,
}

impl Route {
    pub fn url(&self) -> String {
        self.domain.url_for_host(&self.host)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// A named base image applications run on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack {
    pub guid: String,
    pub name: String,
}

/// A provisioned backing service that applications bind to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub guid: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_host_and_domain() {
        let domain = Domain {
            guid: "d".into(),
            name: "example.com".into(),
            shared: true,
        };
        assert_eq!(domain.url_for_host("web"), "web.example.com");
        assert_eq!(domain.url_for_host(""), "example.com");
    }
}
