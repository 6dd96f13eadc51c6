//! HTTP surface: configuration, router, middleware, lifecycle.

pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod module;

pub use config::NetworkConfig;
pub use handlers::AppState;
pub use lifecycle::{HealthState, InFlightGuard, Lifecycle};
pub use module::NetworkModule;
