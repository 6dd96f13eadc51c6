//! Catalog loading: the HTTP sheet source and the shared catalog slot.

pub mod config;
pub mod source;
pub mod state;

pub use config::CatalogConfig;
pub use source::HttpSheetSource;
pub use state::{CatalogHandle, CatalogStatus};
