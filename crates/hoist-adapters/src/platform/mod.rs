//! Local platform: every remote port backed by in-process state.

mod memory;
mod snapshot;
mod state;

pub use memory::{DEFAULT_PAGE_SIZE, InMemoryPlatform, PlatformCall};
pub use snapshot::SnapshotError;
pub use state::{AppRecord, DEFAULT_MEMORY_MB, DomainRecord, PlatformState, ServiceBinding};
