//! Application services - orchestrate use cases.
//!
//! Each component of a push is its own short-lived service borrowing the
//! ports it needs; `PushService` owns the ports and composes them.

pub mod app_service;
pub mod binding_service;
pub mod lifecycle_service;
pub mod manifest_loader;
pub mod push_service;
pub mod route_service;
pub mod stack_service;
pub mod upload_service;

pub use app_service::AppReconciler;
pub use binding_service::ServiceBindings;
pub use lifecycle_service::LifecycleController;
pub use manifest_loader::{ManifestLoader, ManifestSource};
pub use push_service::{PushOptions, PushPorts, PushService};
pub use route_service::RouteReconciler;
pub use stack_service::StackResolver;
pub use upload_service::UploadCoordinator;
