//! Showroom core: vehicle records, facet index, filter/sort/search engine,
//! and the URL state codec.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod events;
pub mod facet;
pub mod field;
pub mod normalize;
pub mod observer;
pub mod record;
pub mod sheet;
pub mod traits;
pub mod url_state;

pub use catalog::Catalog;
pub use engine::{EngineState, InventoryEngine, SortDirection, SortParseError, SortSpec, VisibleSet};
pub use error::LoadError;
pub use events::{BrowserEvent, EventEffect};
pub use facet::{Facet, FacetIndex, FacetOption};
pub use field::{Field, FieldKind, FILTERABLE_FIELDS, SORTABLE_FIELDS};
pub use normalize::{normalize, RawRecord};
pub use observer::{CompositeStateObserver, StateChange, StateObserver};
pub use record::{FieldValue, RecordId, Vehicle};
pub use traits::SheetSource;
pub use url_state::UrlState;
