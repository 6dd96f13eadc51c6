//! View models handed to the templates.
//!
//! Everything here is derived from an engine state and its visible set;
//! templates only iterate and print.

use showroom_core::engine::{SortDirection, SortSpec};
use showroom_core::url_state::{SEARCH_PARAM, SORT_PARAM};
use showroom_core::{EngineState, Vehicle, VisibleSet, SORTABLE_FIELDS};

use super::format::{
    camel_case_to_label, card_image, contact_link, detail_rows, details_link, feature_icon,
    has_price, price_label, vehicle_header, ContactTopic, DetailRow,
};

/// One list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleCard {
    pub header: String,
    pub link: String,
    pub image_src: String,
    pub image_alt: String,
    pub price: String,
    pub priced: bool,
    pub details: Vec<DetailRow>,
    pub availability_link: String,
    pub test_drive_link: String,
}

impl VehicleCard {
    #[must_use]
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        let (image_src, image_alt) = card_image(vehicle);
        Self {
            header: vehicle_header(vehicle),
            link: details_link(vehicle),
            image_src,
            image_alt,
            price: price_label(vehicle.price),
            priced: has_price(vehicle.price),
            details: detail_rows(vehicle),
            availability_link: contact_link(ContactTopic::Availability, vehicle),
            test_drive_link: contact_link(ContactTopic::TestDrive, vehicle),
        }
    }
}

/// Cards for every visible record, in visible order.
#[must_use]
pub fn cards(visible: &VisibleSet<'_>) -> Vec<VehicleCard> {
    visible.iter().map(VehicleCard::from_vehicle).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: String,
    pub value: String,
    pub checked: bool,
}

/// A collapsible checkbox group in the filter dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetAccordion {
    pub key: &'static str,
    pub id: String,
    pub label: String,
    pub options: Vec<OptionView>,
}

/// Accordions for facets with more than one option. A single option
/// cannot narrow anything down.
#[must_use]
pub fn accordions(state: &EngineState) -> Vec<FacetAccordion> {
    state
        .facets
        .iter()
        .filter(|facet| facet.options.len() > 1)
        .map(|facet| {
            let key = facet.key.as_str();
            let id = format!("filter-{key}");
            let options = facet
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| OptionView {
                    id: format!("{id}-option-{index}"),
                    value: option.value.clone(),
                    checked: option.active,
                })
                .collect();
            FacetAccordion {
                key,
                label: camel_case_to_label(key),
                id,
                options,
            }
        })
        .collect()
}

/// An active option, shown as a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTag {
    pub key: &'static str,
    pub value: String,
}

impl ActiveTag {
    /// Tooltip text, `"make: Honda"`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{}: {}", self.key, self.value)
    }
}

#[must_use]
pub fn active_tags(state: &EngineState) -> Vec<ActiveTag> {
    state
        .active_options()
        .map(|(key, value)| ActiveTag {
            key: key.as_str(),
            value: value.to_string(),
        })
        .collect()
}

/// An entry of the sort `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortChoice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// `- none -` followed by every sortable field ascending then descending.
#[must_use]
pub fn sort_choices(current: Option<SortSpec>) -> Vec<SortChoice> {
    let mut choices = vec![SortChoice {
        value: String::new(),
        label: "- none -".to_string(),
        selected: current.is_none(),
    }];
    for field in SORTABLE_FIELDS {
        for (direction, word) in [(SortDirection::Asc, "Ascending"), (SortDirection::Desc, "Descending")] {
            let spec = SortSpec::new(field, direction);
            choices.push(SortChoice {
                value: spec.to_string(),
                label: format!("{field} - {word}"),
                selected: current == Some(spec),
            });
        }
    }
    choices
}

/// A `name=value` pair carried by a plain HTML form so a submit keeps the
/// rest of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

/// State the search form must resubmit: active facets and sort.
#[must_use]
pub fn search_form_fields(state: &EngineState) -> Vec<HiddenField> {
    let mut fields: Vec<HiddenField> = state
        .active_options()
        .map(|(key, value)| HiddenField {
            name: key.as_str().to_string(),
            value: value.to_string(),
        })
        .collect();
    if let Some(sort) = state.sort {
        fields.push(HiddenField {
            name: SORT_PARAM.to_string(),
            value: sort.to_string(),
        });
    }
    fields
}

/// State the filter form must resubmit: the search text.
#[must_use]
pub fn filter_form_fields(state: &EngineState) -> Vec<HiddenField> {
    if state.search_text.is_empty() {
        return Vec::new();
    }
    vec![HiddenField {
        name: SEARCH_PARAM.to_string(),
        value: state.search_text.clone(),
    }]
}

/// Everything the full inventory page shows.
#[derive(Debug, Clone)]
pub struct PageView {
    pub search_text: String,
    pub search_fields: Vec<HiddenField>,
    pub filter_fields: Vec<HiddenField>,
    pub accordions: Vec<FacetAccordion>,
    pub sort_choices: Vec<SortChoice>,
    pub sort_param: &'static str,
    pub search_param: &'static str,
    pub query: String,
    pub list_html: String,
    pub outside_tags_html: String,
    pub inside_tags_html: String,
}

/// A feature line with its icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureView {
    pub icon: &'static str,
    pub text: String,
}

/// Everything the vehicle details page shows.
#[derive(Debug, Clone)]
pub struct DetailsView {
    pub title: String,
    pub description: String,
    pub condition: String,
    pub year: String,
    pub make: String,
    pub subtitle: String,
    pub card: VehicleCard,
    pub images: Vec<String>,
    pub image_alt: String,
    pub features: Vec<FeatureView>,
    pub notes: String,
}

impl DetailsView {
    #[must_use]
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        let Vehicle {
            condition,
            year,
            make,
            model,
            trim,
            body_style,
            ..
        } = vehicle;
        Self {
            title: format!("{year} {make} {model} {trim}"),
            description: format!("Check out this {condition} {year} {make} {model} {trim} {body_style}!"),
            condition: condition.clone(),
            year: year.clone(),
            make: make.clone(),
            subtitle: format!("{model} {trim} {body_style}"),
            card: VehicleCard::from_vehicle(vehicle),
            images: vehicle.images.clone(),
            image_alt: format!("{condition} {year} {make} {model} {trim} {body_style}"),
            features: vehicle
                .features
                .iter()
                .map(|text| FeatureView {
                    icon: feature_icon(text),
                    text: text.clone(),
                })
                .collect(),
            notes: vehicle.notes.clone(),
        }
    }
}
