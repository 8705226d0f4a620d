//! Application layer for Hoist.
//!
//! This layer contains:
//! - **Services**: the push pipeline components and `PushService`
//! - **Ports**: Interface definitions (traits) for the platform and the manifest
//! - **Events**: user-facing progress, rendered by the driving adapter
//! - **Errors**: platform, manifest, and orchestration failures
//!
//! The application layer sequences remote calls; the rules it applies
//! (merging, hostnames, validation) live in `crate::domain`.

pub mod context;
pub mod error;
pub mod events;
pub mod ports;
pub mod services;

pub use services::{ManifestSource, PushOptions, PushPorts, PushService};

pub use context::{OrganizationFields, SpaceFields, TargetContext};
pub use error::{
    ApplicationError, EntityKind, ErrorCode, ManifestError, PlatformError, PlatformResult,
};
pub use events::{PushEvent, PushReporter, SilentReporter};
