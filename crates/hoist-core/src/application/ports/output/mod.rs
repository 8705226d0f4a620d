//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what a push needs from the platform and the local
//! machine. The `hoist-adapters` crate provides implementations.
//!
//! Every platform call returns [`PlatformResult`]; "not found" is reported as
//! [`PlatformError::NotFound`](crate::application::error::PlatformError::NotFound)
//! so callers can branch on it.

use std::path::{Path, PathBuf};

use crate::application::error::{ManifestError, PlatformResult};
use crate::domain::{
    Application, ApplicationParameters, Domain, Route, ServiceInstance, Stack,
};

/// Port for application records.
///
/// Implemented by:
/// - `hoist_adapters::platform::InMemoryPlatform`
#[cfg_attr(test, mockall::automock)]
pub trait AppRepository: Send + Sync {
    fn find_by_name(&self, name: &str) -> PlatformResult<Application>;

    fn create(&self, params: &ApplicationParameters) -> PlatformResult<Application>;

    /// Apply every present field of `params` to the app `guid`.
    fn update(&self, guid: &str, params: &ApplicationParameters) -> PlatformResult<Application>;
}

/// Port for routes and their bindings to apps.
#[cfg_attr(test, mockall::automock)]
pub trait RouteRepository: Send + Sync {
    fn find_by_host_and_domain(&self, host: &str, domain_name: &str) -> PlatformResult<Route>;

    fn create_in_space(
        &self,
        host: &str,
        domain_guid: &str,
        space_guid: &str,
    ) -> PlatformResult<Route>;

    fn bind(&self, route_guid: &str, app_guid: &str) -> PlatformResult<()>;

    fn unbind(&self, route_guid: &str, app_guid: &str) -> PlatformResult<()>;

    fn delete(&self, route_guid: &str) -> PlatformResult<()>;
}

/// Lazy, finite listing of an organization's domains.
///
/// Consumers may stop after any element; implementations must not fetch
/// pages that are never asked for.
pub type DomainListing = Box<dyn Iterator<Item = PlatformResult<Domain>> + Send>;

#[cfg_attr(test, mockall::automock)]
pub trait DomainRepository: Send + Sync {
    fn find_by_name_in_org(&self, name: &str, org_guid: &str) -> PlatformResult<Domain>;

    fn list_domains_for_org(&self, org_guid: &str) -> DomainListing;
}

#[cfg_attr(test, mockall::automock)]
pub trait StackRepository: Send + Sync {
    fn find_by_name(&self, name: &str) -> PlatformResult<Stack>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ServiceRepository: Send + Sync {
    fn find_instance_by_name(&self, name: &str) -> PlatformResult<ServiceInstance>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ServiceBinder: Send + Sync {
    /// Fails with `ErrorCode::AppAlreadyBound` when the binding exists.
    fn bind_application(
        &self,
        app: &Application,
        instance: &ServiceInstance,
    ) -> PlatformResult<()>;
}

/// What an upload is about to transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub path: PathBuf,
    /// Size of the changed files.
    pub bytes: u64,
    /// Number of changed files. Zero means the transfer is skipped.
    pub file_count: u64,
}

/// Port for transferring application bits.
///
/// The uploader diffs `path` against what the platform already holds, calls
/// `on_progress` exactly once with the result, and only transfers when the
/// file count is non-zero.
pub trait AppBitsRepository: Send + Sync {
    fn upload_app(
        &self,
        app_guid: &str,
        path: &Path,
        on_progress: &mut dyn FnMut(UploadProgress),
    ) -> PlatformResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait AppStarter: Send + Sync {
    /// How long the next `start` waits for instances; `None` restores the
    /// platform default.
    fn set_start_timeout_seconds(&self, seconds: Option<u32>);

    fn start(&self, app: &Application) -> PlatformResult<Application>;
}

#[cfg_attr(test, mockall::automock)]
pub trait AppStopper: Send + Sync {
    fn stop(&self, app: &Application) -> PlatformResult<Application>;
}

/// A parsed manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub applications: Vec<ApplicationParameters>,
}

impl Manifest {
    pub fn applications(&self) -> &[ApplicationParameters] {
        &self.applications
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ManifestRepository: Send + Sync {
    /// `path` may name a file or a directory holding `manifest.yml`.
    fn read_manifest(&self, path: &Path) -> Result<Manifest, ManifestError>;
}

/// Source of the two-word suffix used by `--random-route`.
#[cfg_attr(test, mockall::automock)]
pub trait WordGenerator: Send + Sync {
    fn babble(&self) -> String;
}
