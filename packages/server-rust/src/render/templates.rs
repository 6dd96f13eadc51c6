//! `askama` template bindings.

use askama::Template;

use super::views::{ActiveTag, DetailsView, PageView, VehicleCard};

#[derive(Template)]
#[template(path = "inventory.html")]
pub struct InventoryPage<'a> {
    pub view: &'a PageView,
}

/// The `<li>` items of the card list, or the "No results..." item.
#[derive(Template)]
#[template(path = "vehicle_list.html")]
pub struct VehicleList<'a> {
    pub cards: &'a [VehicleCard],
}

/// Active filter tags. Tags inside the dialog carry a remove control.
#[derive(Template)]
#[template(path = "active_filters.html")]
pub struct ActiveFilters<'a> {
    pub tags: &'a [ActiveTag],
    pub removable: bool,
}

#[derive(Template)]
#[template(path = "vehicle.html")]
pub struct VehiclePage<'a> {
    pub view: &'a DetailsView,
}

/// Placeholder shown while the catalog loads or after it failed.
#[derive(Template)]
#[template(path = "status.html")]
pub struct StatusPage<'a> {
    pub kind: &'a str,
    pub message: &'a str,
}

impl StatusPage<'static> {
    pub const LOADING: Self = Self {
        kind: "loading",
        message: "Loading inventory...",
    };

    pub const UNAVAILABLE: Self = Self {
        kind: "error",
        message: "Our inventory is currently unavailable. Please try again later.",
    };

    pub const NOT_FOUND: Self = Self {
        kind: "not-found",
        message: "This vehicle is no longer available.",
    };
}
