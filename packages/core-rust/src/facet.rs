//! Facet model and the facet index built from the full catalog.
//!
//! Option lists always reflect the whole catalog, never the filtered view,
//! so a user can broaden a narrowed search back out from the same dialog.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field::{Field, FILTERABLE_FIELDS};
use crate::record::{natural_cmp, Vehicle};

/// One candidate value of a facet with its selection flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub active: bool,
}

/// A filterable field and its distinct values.
///
/// Option values are unique within a facet and sorted by natural order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub key: Field,
    pub options: Vec<FacetOption>,
}

impl Facet {
    /// Builds the facet for `key` from every record's value.
    #[must_use]
    pub fn from_records(key: Field, records: &[Vehicle]) -> Self {
        let distinct: BTreeSet<String> = records
            .iter()
            .filter_map(|record| record.field(key).as_facet_value())
            .map(|value| value.into_owned())
            .collect();

        let mut values: Vec<String> = distinct.into_iter().collect();
        values.sort_by(|a, b| natural_cmp(a, b));

        Self {
            key,
            options: values
                .into_iter()
                .map(|value| FacetOption { value, active: false })
                .collect(),
        }
    }

    #[must_use]
    pub fn option(&self, value: &str) -> Option<&FacetOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn option_mut(&mut self, value: &str) -> Option<&mut FacetOption> {
        self.options.iter_mut().find(|option| option.value == value)
    }

    /// Values of the currently active options, in option order.
    pub fn active_values(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|option| option.active)
            .map(|option| option.value.as_str())
    }

    #[must_use]
    pub fn has_active(&self) -> bool {
        self.options.iter().any(|option| option.active)
    }

    /// Whether a record satisfies this facet. Facets with no active option
    /// impose no constraint; a record with a missing value never matches an
    /// active facet.
    #[must_use]
    pub fn matches(&self, record: &Vehicle) -> bool {
        if !self.has_active() {
            return true;
        }
        match record.field(self.key).as_facet_value() {
            Some(value) => self.active_values().any(|active| active == value),
            None => false,
        }
    }

    pub fn deactivate_all(&mut self) {
        for option in &mut self.options {
            option.active = false;
        }
    }
}

/// The set of facets derived from one catalog load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetIndex {
    facets: Vec<Facet>,
}

impl FacetIndex {
    /// Builds one facet per key, in key order. Duplicate keys are kept once.
    #[must_use]
    pub fn build(records: &[Vehicle], keys: &[Field]) -> Self {
        let mut seen = BTreeSet::new();
        let facets = keys
            .iter()
            .copied()
            .filter(|key| seen.insert(*key))
            .map(|key| Facet::from_records(key, records))
            .collect();
        Self { facets }
    }

    /// Builds the index over [`FILTERABLE_FIELDS`].
    #[must_use]
    pub fn for_catalog(records: &[Vehicle]) -> Self {
        Self::build(records, &FILTERABLE_FIELDS)
    }

    /// Builds the index from field names, skipping names that are not known
    /// fields or that cannot be faceted (lists).
    #[must_use]
    pub fn from_key_names<S: AsRef<str>>(records: &[Vehicle], names: &[S]) -> Self {
        let keys: Vec<Field> = names
            .iter()
            .filter_map(|name| match name.as_ref().parse::<Field>() {
                Ok(field) if field.kind() != crate::field::FieldKind::List => Some(field),
                Ok(field) => {
                    debug!(key = %field, "list field cannot be faceted, skipping");
                    None
                }
                Err(err) => {
                    debug!(%err, "skipping facet key");
                    None
                }
            })
            .collect();
        Self::build(records, &keys)
    }

    #[must_use]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    #[must_use]
    pub fn get(&self, key: Field) -> Option<&Facet> {
        self.facets.iter().find(|facet| facet.key == key)
    }

    /// Hands out a fresh, fully inactive copy of the facets for an engine.
    #[must_use]
    pub fn to_facets(&self) -> Vec<Facet> {
        self.facets.clone()
    }
}
