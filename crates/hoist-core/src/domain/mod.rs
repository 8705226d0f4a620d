//! Core domain layer for Hoist.
//!
//! Pure push logic: parameter merging, hostname derivation, and the value
//! types shared by every layer. Nothing here performs I/O or logs; remote
//! calls go through the ports in `crate::application`.

pub mod app_set;
pub mod entities;
pub mod error;
pub mod hostname;
pub mod value_objects;

mod validation;

pub use app_set::AppSet;
pub use entities::{
    Application, ApplicationParameters, Domain, Route, ServiceInstance, Stack,
};
pub use error::{DomainError, ErrorCategory};
pub use validation::DomainValidator;
pub use value_objects::{AppState, ByteSize};
