//! HTML rendering of the inventory browser and the details page.

pub mod browser;
pub mod error;
pub mod format;
pub mod templates;
pub mod views;

pub use browser::{render_details, EventOutcome, Fragments, InventoryBrowser, INVENTORY_PATH};
pub use error::BrowserError;
