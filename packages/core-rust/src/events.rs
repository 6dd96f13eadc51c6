//! Browser event contract between the page and the render adapter.
//!
//! Each event carries only the payload its engine operation needs. The JSON
//! form mirrors a DOM `CustomEvent`: a namespaced `type` and a `detail`
//! object.
//!
//! ```json
//! { "type": "inventory-browser/filterOption/add",
//!   "detail": { "filterKey": "make", "optionValue": "Honda" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::InventoryEngine;

/// Namespace prefix of every event name.
pub const EVENT_NAMESPACE: &str = "inventory-browser";

/// An interaction reported by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all_fields = "camelCase")]
pub enum BrowserEvent {
    #[serde(rename = "inventory-browser/filterOption/add")]
    FilterOptionAdd { filter_key: String, option_value: String },
    #[serde(rename = "inventory-browser/filterOption/remove")]
    FilterOptionRemove { filter_key: String, option_value: String },
    #[serde(rename = "inventory-browser/clearAll")]
    ClearAll,
    #[serde(rename = "inventory-browser/sortBy/update")]
    SortByUpdate {
        #[serde(default)]
        value: String,
    },
    #[serde(rename = "inventory-browser/filterDialog/open")]
    FilterDialogOpen,
    #[serde(rename = "inventory-browser/filterDialog/confirm")]
    FilterDialogConfirm,
    #[serde(rename = "inventory-browser/search/submit")]
    SearchSubmit {
        #[serde(default)]
        query: String,
    },
}

impl BrowserEvent {
    /// The namespaced event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BrowserEvent::FilterOptionAdd { .. } => "inventory-browser/filterOption/add",
            BrowserEvent::FilterOptionRemove { .. } => "inventory-browser/filterOption/remove",
            BrowserEvent::ClearAll => "inventory-browser/clearAll",
            BrowserEvent::SortByUpdate { .. } => "inventory-browser/sortBy/update",
            BrowserEvent::FilterDialogOpen => "inventory-browser/filterDialog/open",
            BrowserEvent::FilterDialogConfirm => "inventory-browser/filterDialog/confirm",
            BrowserEvent::SearchSubmit { .. } => "inventory-browser/search/submit",
        }
    }
}

/// What the render adapter must do after the engine handled an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEffect {
    /// State may have changed; re-render from the engine. `changed` is
    /// `false` for no-ops such as toggling an unknown option.
    Updated { changed: bool },
    /// Write the state to the URL with a full navigation.
    Navigate { query: String },
    /// Show the filter/sort dialog. Engine state is untouched.
    OpenDialog,
}

impl InventoryEngine {
    /// Applies a browser event to this engine.
    pub fn handle_event(&mut self, event: &BrowserEvent) -> EventEffect {
        match event {
            BrowserEvent::FilterOptionAdd {
                filter_key,
                option_value,
            } => EventEffect::Updated {
                changed: self.toggle_facet_option(filter_key, option_value, true),
            },
            BrowserEvent::FilterOptionRemove {
                filter_key,
                option_value,
            } => EventEffect::Updated {
                changed: self.toggle_facet_option(filter_key, option_value, false),
            },
            BrowserEvent::ClearAll => {
                self.clear_all();
                EventEffect::Navigate {
                    query: self.state().to_query(),
                }
            }
            BrowserEvent::SortByUpdate { value } => {
                let before = self.state().sort;
                self.set_sort_value(value);
                EventEffect::Updated {
                    changed: before != self.state().sort,
                }
            }
            BrowserEvent::FilterDialogOpen => EventEffect::OpenDialog,
            BrowserEvent::FilterDialogConfirm => EventEffect::Navigate {
                query: self.state().to_query(),
            },
            BrowserEvent::SearchSubmit { query } => {
                let changed = self.state().search_text != *query;
                self.set_search_text(query.clone());
                EventEffect::Updated { changed }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::engine::{SortDirection, SortSpec};
    use crate::field::Field;
    use crate::record::{RecordId, Vehicle};

    fn engine() -> InventoryEngine {
        InventoryEngine::from_records(vec![
            Vehicle {
                id: RecordId::from("1"),
                make: "Honda".into(),
                model: "Civic".into(),
                ..Vehicle::default()
            },
            Vehicle {
                id: RecordId::from("2"),
                make: "Toyota".into(),
                model: "Camry".into(),
                ..Vehicle::default()
            },
        ])
    }

    #[test]
    fn json_shape_matches_custom_event() {
        let event: BrowserEvent = serde_json::from_value(json!({
            "type": "inventory-browser/filterOption/add",
            "detail": { "filterKey": "make", "optionValue": "Honda" },
        }))
        .unwrap();
        assert_eq!(
            event,
            BrowserEvent::FilterOptionAdd {
                filter_key: "make".into(),
                option_value: "Honda".into(),
            }
        );
        assert_eq!(event.name(), "inventory-browser/filterOption/add");

        let unit: BrowserEvent =
            serde_json::from_value(json!({ "type": "inventory-browser/clearAll" })).unwrap();
        assert_eq!(unit, BrowserEvent::ClearAll);
    }

    #[test]
    fn names_match_serialized_tags() {
        let events = [
            BrowserEvent::FilterOptionRemove {
                filter_key: "make".into(),
                option_value: "Honda".into(),
            },
            BrowserEvent::SortByUpdate {
                value: "price;asc".into(),
            },
            BrowserEvent::FilterDialogOpen,
            BrowserEvent::FilterDialogConfirm,
            BrowserEvent::SearchSubmit { query: "civic".into() },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["type"], event.name());
            assert!(event.name().starts_with(EVENT_NAMESPACE));
        }
    }

    #[test]
    fn option_events_toggle() {
        let mut engine = engine();
        let effect = engine.handle_event(&BrowserEvent::FilterOptionAdd {
            filter_key: "make".into(),
            option_value: "Toyota".into(),
        });
        assert_eq!(effect, EventEffect::Updated { changed: true });
        assert_eq!(engine.evaluate().len(), 1);

        let effect = engine.handle_event(&BrowserEvent::FilterOptionRemove {
            filter_key: "colour".into(),
            option_value: "Red".into(),
        });
        assert_eq!(effect, EventEffect::Updated { changed: false });
    }

    #[test]
    fn confirm_and_clear_navigate() {
        let mut engine = engine();
        engine.toggle(Field::Make, "Honda", true);
        engine.set_sort(Field::Year.as_str(), SortDirection::Asc);

        assert_eq!(
            engine.handle_event(&BrowserEvent::FilterDialogConfirm),
            EventEffect::Navigate {
                query: "make=Honda&sortBy=year%3Basc".into()
            }
        );
        assert_eq!(
            engine.handle_event(&BrowserEvent::ClearAll),
            EventEffect::Navigate { query: String::new() }
        );
    }

    #[test]
    fn sort_and_search_events() {
        let mut engine = engine();
        let effect = engine.handle_event(&BrowserEvent::SortByUpdate {
            value: "price;desc".into(),
        });
        assert_eq!(effect, EventEffect::Updated { changed: true });
        assert_eq!(
            engine.state().sort,
            Some(SortSpec::new(Field::Price, SortDirection::Desc))
        );

        engine.handle_event(&BrowserEvent::SortByUpdate { value: String::new() });
        assert_eq!(engine.state().sort, None);

        let effect = engine.handle_event(&BrowserEvent::SearchSubmit { query: "CAMRY".into() });
        assert_eq!(effect, EventEffect::Updated { changed: true });
        assert_eq!(engine.evaluate().ids(), vec![&RecordId::from("2")]);
    }

    #[test]
    fn dialog_open_leaves_state() {
        let mut engine = engine();
        let before = engine.state().clone();
        assert_eq!(engine.handle_event(&BrowserEvent::FilterDialogOpen), EventEffect::OpenDialog);
        assert_eq!(engine.state(), &before);
    }
}
