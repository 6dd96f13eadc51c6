//! Showroom server: loads the vehicle catalog over HTTP and serves the
//! inventory browser, its event endpoint and vehicle detail pages.

pub mod catalog;
pub mod cli;
pub mod network;
pub mod observability;
pub mod render;

pub use catalog::{CatalogConfig, CatalogHandle, CatalogStatus, HttpSheetSource};
pub use cli::ServerArgs;
pub use network::{NetworkConfig, NetworkModule};
pub use render::{BrowserError, EventOutcome, InventoryBrowser};
