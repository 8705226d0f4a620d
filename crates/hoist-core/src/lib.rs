//! Hoist Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Hoist
//! application push orchestrator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            hoist-cli (CLI)              │
//! │   flags, config, logging, rendering     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │  PushService: stack → app → route →     │
//! │  upload → services → lifecycle          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │  AppRepository, RouteRepository, ...    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     hoist-adapters (Infrastructure)     │
//! │  InMemoryPlatform, YAML manifests, ...  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  AppSet merge, hostnames, validation    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hoist_core::prelude::*;
//!
//! let service = PushService::new(ports, context, Box::new(SilentReporter));
//! let apps = service.resolve_apps(cli, &ManifestSource::Discover(cwd.clone()), &cwd)?;
//! let pushed = service.push(&apps, &PushOptions::default())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ManifestSource, PushEvent, PushOptions, PushPorts, PushReporter, PushService,
        SilentReporter, TargetContext,
    };
    pub use crate::domain::{AppSet, Application, ApplicationParameters, DomainValidator};
    pub use crate::error::{HoistError, HoistResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
