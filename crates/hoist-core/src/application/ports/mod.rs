//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `hoist-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - platform repositories (apps, routes, domains, stacks, services)
//!   - `AppBitsRepository`, `AppStarter`, `AppStopper`
//!   - `ManifestRepository`, `WordGenerator`
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `PushService` itself; the CLI drives it directly

pub mod output;

pub use output::{
    AppBitsRepository, AppRepository, AppStarter, AppStopper, DomainListing, DomainRepository,
    Manifest, ManifestRepository, RouteRepository, ServiceBinder, ServiceRepository,
    StackRepository, UploadProgress, WordGenerator,
};

#[cfg(test)]
pub use output::{
    MockAppRepository, MockAppStarter, MockAppStopper, MockDomainRepository,
    MockManifestRepository, MockRouteRepository, MockServiceBinder, MockServiceRepository,
    MockStackRepository, MockWordGenerator,
};
