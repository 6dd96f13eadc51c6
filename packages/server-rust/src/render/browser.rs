//! The inventory browser render adapter.
//!
//! Owns one [`InventoryEngine`] per page view and keeps the rendered list
//! and tag fragments in step with it through a [`StateObserver`]. Browser
//! events go in, [`EventOutcome`]s come out.

use std::sync::Arc;

use askama::Template;
use parking_lot::Mutex;
use serde::Serialize;
use showroom_core::{
    url_state, BrowserEvent, Catalog, EngineState, EventEffect, InventoryEngine, StateChange,
    StateObserver, Vehicle, VisibleSet,
};
use tracing::{debug, error};

use super::error::BrowserError;
use super::templates::{ActiveFilters, InventoryPage, VehicleList, VehiclePage};
use super::views::{
    accordions, active_tags, cards, filter_form_fields, search_form_fields, sort_choices,
    DetailsView, PageView,
};

/// Path of the inventory page; navigations append the encoded state.
pub const INVENTORY_PATH: &str = "/inventory";

/// What the page must do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EventOutcome {
    /// Full navigation to the given location.
    Navigate { location: String },
    /// Replace the list and tag containers in place.
    Render {
        query: String,
        list_html: String,
        active_filters_html: String,
        dialog_filters_html: String,
    },
    /// Show the filter/sort dialog.
    Dialog { open: bool },
}

impl EventOutcome {
    #[must_use]
    pub fn navigate(query: &str) -> Self {
        let location = if query.is_empty() {
            INVENTORY_PATH.to_string()
        } else {
            format!("{INVENTORY_PATH}?{query}")
        };
        Self::Navigate { location }
    }
}

/// Rendered markup for one engine state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub query: String,
    pub list_html: String,
    /// Tags next to the Filter/Sort button.
    pub outside_tags_html: String,
    /// Removable tags inside the dialog.
    pub inside_tags_html: String,
}

impl Fragments {
    /// Renders the list and both tag containers.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Render`] if a template fails.
    pub fn render(state: &EngineState, visible: &VisibleSet<'_>) -> Result<Self, BrowserError> {
        let cards = cards(visible);
        let tags = active_tags(state);
        Ok(Self {
            query: state.to_query(),
            list_html: VehicleList { cards: &cards }.render()?,
            outside_tags_html: ActiveFilters {
                tags: &tags,
                removable: false,
            }
            .render()?,
            inside_tags_html: ActiveFilters {
                tags: &tags,
                removable: true,
            }
            .render()?,
        })
    }
}

/// Re-renders the fragments on every state change.
#[derive(Default)]
struct FragmentRenderer {
    latest: Mutex<Option<Result<Fragments, BrowserError>>>,
}

impl FragmentRenderer {
    fn take(&self) -> Option<Result<Fragments, BrowserError>> {
        self.latest.lock().take()
    }
}

impl StateObserver for FragmentRenderer {
    fn on_state_change(&self, change: &StateChange, state: &EngineState, visible: &VisibleSet<'_>) {
        debug!(?change, visible = visible.len(), "re-rendering inventory fragments");
        let rendered = Fragments::render(state, visible);
        if let Err(e) = &rendered {
            error!(error = %e, "inventory fragment rendering failed");
        }
        *self.latest.lock() = Some(rendered);
    }
}

/// One page view's browser: engine plus render subscription.
pub struct InventoryBrowser {
    engine: InventoryEngine,
    renderer: Arc<FragmentRenderer>,
}

impl InventoryBrowser {
    /// Builds a browser over `catalog` seeded from a query string.
    #[must_use]
    pub fn new(catalog: &Catalog, query: &str) -> Self {
        let mut engine = catalog.engine();
        let renderer = Arc::new(FragmentRenderer::default());
        engine.subscribe(Arc::clone(&renderer) as Arc<dyn StateObserver>);
        engine.apply(&url_state::decode(query));
        Self { engine, renderer }
    }

    #[must_use]
    pub fn engine(&self) -> &InventoryEngine {
        &self.engine
    }

    /// Fragments for the current state.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Render`] if a template fails.
    pub fn fragments(&self) -> Result<Fragments, BrowserError> {
        match self.renderer.take() {
            Some(rendered) => rendered,
            None => Fragments::render(self.engine.state(), &self.engine.evaluate()),
        }
    }

    /// The full inventory page.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Render`] if a template fails.
    pub fn page(&self) -> Result<String, BrowserError> {
        let fragments = self.fragments()?;
        let state = self.engine.state();
        let view = PageView {
            search_text: state.search_text.clone(),
            search_fields: search_form_fields(state),
            filter_fields: filter_form_fields(state),
            accordions: accordions(state),
            sort_choices: sort_choices(state.sort),
            sort_param: url_state::SORT_PARAM,
            search_param: url_state::SEARCH_PARAM,
            query: fragments.query,
            list_html: fragments.list_html,
            outside_tags_html: fragments.outside_tags_html,
            inside_tags_html: fragments.inside_tags_html,
        };
        Ok(InventoryPage { view: &view }.render()?)
    }

    /// Applies a browser event and reports what the page must do.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Render`] if re-rendering fails.
    pub fn dispatch(&mut self, event: &BrowserEvent) -> Result<EventOutcome, BrowserError> {
        match self.engine.handle_event(event) {
            EventEffect::Navigate { query } => Ok(EventOutcome::navigate(&query)),
            EventEffect::OpenDialog => Ok(EventOutcome::Dialog { open: true }),
            EventEffect::Updated { changed } => {
                if !changed {
                    debug!(event = event.name(), "event left the state unchanged");
                }
                let fragments = self.fragments()?;
                Ok(EventOutcome::Render {
                    query: fragments.query,
                    list_html: fragments.list_html,
                    active_filters_html: fragments.outside_tags_html,
                    dialog_filters_html: fragments.inside_tags_html,
                })
            }
        }
    }
}

/// The details page of one vehicle.
///
/// # Errors
///
/// Returns [`BrowserError::Render`] if the template fails.
pub fn render_details(vehicle: &Vehicle) -> Result<String, BrowserError> {
    let view = DetailsView::from_vehicle(vehicle);
    Ok(VehiclePage { view: &view }.render()?)
}
