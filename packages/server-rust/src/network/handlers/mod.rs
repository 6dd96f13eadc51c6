//! Route handlers and the state they share.

pub mod catalog;
pub mod health;
pub mod inventory;

pub use catalog::reload_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use inventory::{inventory_event_handler, inventory_page_handler, vehicle_page_handler};

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::CatalogHandle;

use super::{Lifecycle, NetworkConfig};

/// Shared state passed to every handler via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    /// The published catalog and its loader.
    pub catalog: Arc<CatalogHandle>,
    /// Health state and in-flight tracking.
    pub lifecycle: Arc<Lifecycle>,
    pub config: Arc<NetworkConfig>,
    /// Used for uptime reporting.
    pub start_time: Instant,
}
