//! Filter/sort/search engine.
//!
//! [`InventoryEngine`] owns one [`EngineState`] over a shared, immutable record
//! collection. Every operation is synchronous; [`InventoryEngine::evaluate`]
//! recomputes the visible set from scratch on each call.
//!
//! Operations that reference an unknown facet key, option value, or sort key
//! are silent no-ops: they can come from stale UI state or a tampered URL and
//! must not break the page.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::facet::{Facet, FacetIndex};
use crate::field::Field;
use crate::observer::{CompositeStateObserver, StateChange, StateObserver};
use crate::record::{compare_present, RecordId, Vehicle};
use crate::url_state::{self, UrlState};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Applies the direction to an ascending ordering.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(SortParseError::Direction(other.to_string())),
        }
    }
}

/// Why a `key;direction` sort token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortParseError {
    #[error("sort token has no ';' separator: {0:?}")]
    MissingSeparator(String),
    #[error("unknown sort key: {0:?}")]
    Key(String),
    #[error("unknown sort direction: {0:?}")]
    Direction(String),
}

/// A sort key with its direction. Wire form: `key;direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: Field, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Orders two records by this spec.
    ///
    /// Records missing the value sort before every present value in both
    /// directions, so their placement does not flip with the direction.
    #[must_use]
    pub fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering {
        let (left, right) = (a.field(self.field), b.field(self.field));
        match (left.is_missing(), right.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .direction
                .apply(compare_present(&left, &right).unwrap_or(Ordering::Equal)),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.field, self.direction.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = s
            .split_once(';')
            .ok_or_else(|| SortParseError::MissingSeparator(s.to_string()))?;
        let field = key
            .parse::<Field>()
            .ok()
            .filter(|field| field.is_sortable())
            .ok_or_else(|| SortParseError::Key(key.to_string()))?;
        Ok(Self::new(field, direction.parse()?))
    }
}

/// The complete mutable state behind one inventory browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub search_text: String,
    pub sort: Option<SortSpec>,
    pub facets: Vec<Facet>,
}

impl EngineState {
    #[must_use]
    pub fn facet(&self, key: Field) -> Option<&Facet> {
        self.facets.iter().find(|facet| facet.key == key)
    }

    /// `(facet key, value)` for every active option, in facet then option order.
    pub fn active_options(&self) -> impl Iterator<Item = (Field, &str)> {
        self.facets
            .iter()
            .flat_map(|facet| facet.active_values().map(move |value| (facet.key, value)))
    }

    /// Query-string form of this state.
    #[must_use]
    pub fn to_query(&self) -> String {
        url_state::encode(self)
    }
}

/// The ordered records currently matching the engine state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSet<'a> {
    records: Vec<&'a Vehicle>,
}

impl<'a> VisibleSet<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Vehicle> + '_ {
        self.records.iter().copied()
    }

    #[must_use]
    pub fn records(&self) -> &[&'a Vehicle] {
        &self.records
    }

    /// Ids in visible order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'a RecordId> {
        self.records.iter().map(|record| &record.id).collect()
    }
}

/// Filter/sort/search engine over one record collection.
#[derive(Debug)]
pub struct InventoryEngine {
    records: Arc<[Vehicle]>,
    state: EngineState,
    observers: CompositeStateObserver,
}

impl InventoryEngine {
    /// Creates an engine with every option inactive, no search and no sort.
    #[must_use]
    pub fn new(records: Arc<[Vehicle]>, facets: &FacetIndex) -> Self {
        Self {
            records,
            state: EngineState {
                facets: facets.to_facets(),
                ..EngineState::default()
            },
            observers: CompositeStateObserver::default(),
        }
    }

    /// Builds the facet index over the records and wraps them in an engine.
    #[must_use]
    pub fn from_records(records: Vec<Vehicle>) -> Self {
        let facets = FacetIndex::for_catalog(&records);
        Self::new(records.into(), &facets)
    }

    /// Registers an observer notified after every state change.
    pub fn subscribe(&mut self, observer: Arc<dyn StateObserver>) {
        self.observers.add(observer);
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub fn records(&self) -> &[Vehicle] {
        &self.records
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Vehicle> {
        self.records.iter().find(|record| record.id.as_str() == id)
    }

    /// Sets one option's `active` flag by wire names.
    ///
    /// Returns `true` when the flag changed. Unknown keys or values are a
    /// no-op.
    pub fn toggle_facet_option(&mut self, facet_key: &str, value: &str, active: bool) -> bool {
        match facet_key.parse::<Field>() {
            Ok(key) => self.toggle(key, value, active),
            Err(err) => {
                debug!(%err, value, "ignoring toggle for unknown facet key");
                false
            }
        }
    }

    /// Typed variant of [`toggle_facet_option`](Self::toggle_facet_option).
    pub fn toggle(&mut self, key: Field, value: &str, active: bool) -> bool {
        if !self.set_option(key, value, active) {
            return false;
        }
        self.notify(&StateChange::FacetOption {
            key,
            value: value.to_string(),
            active,
        });
        true
    }

    /// Replaces the search text verbatim. Trimming and case folding happen at
    /// evaluation time.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.state.search_text == text {
            return;
        }
        self.state.search_text = text;
        self.notify(&StateChange::Search);
    }

    /// Sets the sort by wire key. An empty or unrecognized key clears the
    /// sort.
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        let spec = match key.parse::<Field>() {
            Ok(field) if field.is_sortable() => Some(SortSpec::new(field, direction)),
            Ok(field) => {
                debug!(key = %field, "field is not sortable, clearing sort");
                None
            }
            Err(_) if key.is_empty() => None,
            Err(err) => {
                debug!(%err, "unrecognized sort key, clearing sort");
                None
            }
        };
        self.set_sort_spec(spec);
    }

    /// Sets the sort from a `key;direction` token such as a sort menu value.
    /// A malformed token clears the sort.
    pub fn set_sort_value(&mut self, value: &str) {
        let spec = if value.is_empty() {
            None
        } else {
            value
                .parse::<SortSpec>()
                .map_err(|err| debug!(%err, "malformed sort token, clearing sort"))
                .ok()
        };
        self.set_sort_spec(spec);
    }

    pub fn set_sort_spec(&mut self, sort: Option<SortSpec>) {
        if self.state.sort == sort {
            return;
        }
        self.state.sort = sort;
        self.notify(&StateChange::Sort);
    }

    /// Deactivates every option and clears search and sort.
    pub fn clear_all(&mut self) {
        for facet in &mut self.state.facets {
            facet.deactivate_all();
        }
        self.state.search_text.clear();
        self.state.sort = None;
        self.notify(&StateChange::ClearAll);
    }

    /// Seeds state from a decoded query string, on top of the current state.
    ///
    /// Tokens are matched against the facet's options, preferring the longest
    /// run of adjacent tokens that rejoins into a known value, so a value
    /// split on a raw comma is recovered. Unknown tokens are skipped
    /// individually; observers are notified once.
    pub fn apply(&mut self, url: &UrlState) {
        for (key, tokens) in &url.facets {
            for value in self.resolve_tokens(*key, tokens) {
                self.set_option(*key, &value, true);
            }
        }
        if let Some(text) = &url.search_text {
            self.state.search_text.clone_from(text);
        }
        self.state.sort = url.sort;
        self.notify(&StateChange::Restored);
    }

    /// Computes the visible set: facet filter, then search filter, then a
    /// stable sort.
    #[must_use]
    pub fn evaluate(&self) -> VisibleSet<'_> {
        let needle = self.state.search_text.trim().to_lowercase();
        let active: Vec<&Facet> = self.state.facets.iter().filter(|f| f.has_active()).collect();

        let mut records: Vec<&Vehicle> = self
            .records
            .iter()
            .filter(|record| active.iter().all(|facet| facet.matches(record)))
            .filter(|record| needle.is_empty() || record.search_haystack().contains(&needle))
            .collect();

        if let Some(sort) = self.state.sort {
            records.sort_by(|a, b| sort.compare(a, b));
        }

        VisibleSet { records }
    }

    fn resolve_tokens(&self, key: Field, tokens: &[String]) -> Vec<String> {
        let Some(facet) = self.state.facet(key) else {
            debug!(key = %key, "ignoring values for field without facet");
            return Vec::new();
        };

        let mut resolved = Vec::new();
        let mut start = 0;
        while start < tokens.len() {
            let matched = (start..tokens.len()).rev().find_map(|end| {
                let candidate = tokens[start..=end].join(",");
                facet.option(&candidate).map(|_| (end, candidate))
            });
            match matched {
                Some((end, value)) => {
                    resolved.push(value);
                    start = end + 1;
                }
                None => {
                    if !tokens[start].is_empty() {
                        debug!(key = %key, value = %tokens[start], "ignoring unknown option value");
                    }
                    start += 1;
                }
            }
        }
        resolved
    }

    fn set_option(&mut self, key: Field, value: &str, active: bool) -> bool {
        let Some(facet) = self.state.facets.iter_mut().find(|facet| facet.key == key) else {
            debug!(key = %key, value, "ignoring toggle for field without facet");
            return false;
        };
        let Some(option) = facet.option_mut(value) else {
            debug!(key = %key, value, "ignoring toggle for unknown option value");
            return false;
        };
        if option.active == active {
            return false;
        }
        option.active = active;
        true
    }

    fn notify(&self, change: &StateChange) {
        if self.observers.is_empty() {
            return;
        }
        let visible = self.evaluate();
        self.observers.on_state_change(change, &self.state, &visible);
    }
}
