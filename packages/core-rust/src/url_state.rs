//! Query-string codec for engine state.
//!
//! Layout: one parameter per facet with its active values comma-joined
//! (`make=Honda,Toyota`), `q` for the search text and `sortBy` as
//! `key;direction`. Parameters with nothing to say are omitted.
//!
//! A comma or percent sign inside a facet value is percent-escaped before
//! joining, so `trim=Sport%2C AWD` names the single value `Sport, AWD`.
//! Hand-written URLs that carry a raw comma inside a value are resolved
//! against the option set by [`InventoryEngine::apply`](crate::InventoryEngine::apply).

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;
use url::form_urlencoded;

use crate::engine::{EngineState, SortSpec};
use crate::field::Field;

/// Query parameter carrying the search text.
pub const SEARCH_PARAM: &str = "q";

/// Query parameter carrying the `key;direction` sort token.
pub const SORT_PARAM: &str = "sortBy";

/// Separator between active values of one facet.
pub const VALUE_SEPARATOR: char = ',';

/// Characters escaped inside a single facet value before joining.
const VALUE_ESCAPES: &AsciiSet = &CONTROLS.add(b',').add(b'%');

/// Engine state as recovered from a query string.
///
/// Partial by nature: it names only what the URL carried. Apply it to an
/// engine with [`InventoryEngine::apply`](crate::InventoryEngine::apply).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlState {
    /// Value tokens per facet, in parameter order, before they are matched
    /// against the option set.
    pub facets: Vec<(Field, Vec<String>)>,
    pub search_text: Option<String>,
    pub sort: Option<SortSpec>,
}

impl UrlState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty() && self.search_text.is_none() && self.sort.is_none()
    }
}

/// Encodes the state as an `application/x-www-form-urlencoded` query string
/// without a leading `?`.
#[must_use]
pub fn encode(state: &EngineState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for facet in &state.facets {
        let joined = facet
            .active_values()
            .map(|value| utf8_percent_encode(value, VALUE_ESCAPES).to_string())
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            serializer.append_pair(facet.key.as_str(), &joined);
        }
    }

    if !state.search_text.is_empty() {
        serializer.append_pair(SEARCH_PARAM, &state.search_text);
    }

    if let Some(sort) = state.sort {
        serializer.append_pair(SORT_PARAM, &sort.to_string());
    }

    serializer.finish()
}

/// Decodes a query string (with or without a leading `?`).
///
/// Never fails: unknown parameters are ignored and a malformed `sortBy`
/// means no sort. A facet parameter given more than once accumulates.
/// Facet tokens are kept in order, empty ones included, so that `apply` can
/// rejoin a value that was split on a raw comma.
#[must_use]
pub fn decode(query: &str) -> UrlState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = UrlState::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            SEARCH_PARAM => state.search_text = Some(value.into_owned()),
            SORT_PARAM => {
                state.sort = value
                    .parse::<SortSpec>()
                    .map_err(|err| debug!(%err, "ignoring malformed sortBy parameter"))
                    .ok();
            }
            name => match name.parse::<Field>() {
                Ok(field) => {
                    let values = value
                        .split(VALUE_SEPARATOR)
                        .map(|token| percent_decode_str(token).decode_utf8_lossy().into_owned());
                    match state.facets.iter_mut().find(|(key, _)| *key == field) {
                        Some((_, existing)) => existing.extend(values),
                        None => state.facets.push((field, values.collect())),
                    }
                }
                Err(_) => debug!(param = name, "ignoring unknown query parameter"),
            },
        }
    }

    state
}
