//! A loaded catalog: the normalized records plus their facet index.

use std::sync::Arc;

use tracing::info;

use crate::engine::InventoryEngine;
use crate::error::LoadError;
use crate::facet::FacetIndex;
use crate::normalize::normalize;
use crate::record::Vehicle;
use crate::sheet::rows_from_payload;
use crate::traits::SheetSource;

/// Immutable record collection and the facets computed from it once.
///
/// Shared between page views via `Arc`; every view builds its own engine.
/// A reload produces a new `Catalog` rather than patching this one.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Arc<[Vehicle]>,
    facets: FacetIndex,
}

impl Catalog {
    #[must_use]
    pub fn new(records: Vec<Vehicle>) -> Self {
        let facets = FacetIndex::for_catalog(&records);
        Self {
            records: records.into(),
            facets,
        }
    }

    /// Fetches, parses and normalizes the catalog.
    ///
    /// # Errors
    ///
    /// Propagates transport, JSON and payload-shape failures. Malformed
    /// fields inside well-formed rows never fail the load.
    pub async fn load(source: &dyn SheetSource) -> Result<Self, LoadError> {
        let payload = source.fetch().await?;
        let rows = rows_from_payload(payload)?;
        let catalog = Self::new(normalize(rows));
        info!(
            source = %source.describe(),
            records = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn records(&self) -> &[Vehicle] {
        &self.records
    }

    #[must_use]
    pub fn facets(&self) -> &FacetIndex {
        &self.facets
    }

    /// The record with this id, if any.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Vehicle> {
        self.records.iter().find(|record| record.id.as_str() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A fresh engine over this catalog with nothing selected.
    #[must_use]
    pub fn engine(&self) -> InventoryEngine {
        InventoryEngine::new(Arc::clone(&self.records), &self.facets)
    }
}
