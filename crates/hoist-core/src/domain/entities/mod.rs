pub mod app_params;
pub mod application;
pub mod route;

pub use app_params::ApplicationParameters;
pub use application::Application;
pub use route::{Domain, Route, ServiceInstance, Stack};
