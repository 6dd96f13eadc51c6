//! Conversion of raw sheet rows into typed [`Vehicle`] records.
//!
//! Normalization is total: a malformed row never fails the batch. Each field
//! degrades on its own (missing numbers become `None`, missing lists become
//! empty) and the record still takes part in rendering and filtering.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::field::Field;
use crate::record::{RecordId, Vehicle};

/// One row as delivered by the data source: a flat JSON object.
pub type RawRecord = serde_json::Map<String, JsonValue>;

/// Bookkeeping column added by the sheet transport; never part of a record.
pub const ORIGIN_LINK_FIELD: &str = "originLink";

/// Separator between entries of the `features` column.
pub const FEATURES_DELIMITER: &str = ", ";

/// Separator between entries of the `images` column.
pub const IMAGES_DELIMITER: char = '\n';

/// Normalizes every row, in order.
///
/// Rows without an `id` column get their 1-based position as id, which is
/// how the source addresses rows by offset.
#[must_use]
pub fn normalize(rows: Vec<RawRecord>) -> Vec<Vehicle> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index + 1, row))
        .collect()
}

/// Normalizes a single row. `position` is the fallback id.
#[must_use]
pub fn normalize_row(position: usize, mut row: RawRecord) -> Vehicle {
    row.remove(ORIGIN_LINK_FIELD);

    let id = match row.remove(Field::Id.as_str()).map(|v| text_of(&v)) {
        Some(id) if !id.is_empty() => RecordId(id),
        _ => RecordId(position.to_string()),
    };

    let mut take_text = |field: Field| row.remove(field.as_str()).map(|v| text_of(&v)).unwrap_or_default();

    let mut vehicle = Vehicle {
        id,
        condition: take_text(Field::Condition),
        year: take_text(Field::Year),
        make: take_text(Field::Make),
        model: take_text(Field::Model),
        trim: take_text(Field::Trim),
        body_style: take_text(Field::BodyStyle),
        exterior_color: take_text(Field::ExteriorColor),
        interior_color: take_text(Field::InteriorColor),
        transmission: take_text(Field::Transmission),
        fuel_type: take_text(Field::FuelType),
        drivetrain: take_text(Field::Drivetrain),
        engine: take_text(Field::Engine),
        fuel_economy: take_text(Field::FuelEconomy),
        vin: take_text(Field::Vin),
        notes: take_text(Field::Notes),
        ..Vehicle::default()
    };

    vehicle.price = take_number(&mut row, Field::Price, &vehicle.id);
    vehicle.miles = take_number(&mut row, Field::Miles, &vehicle.id);
    vehicle.seats = take_number(&mut row, Field::Seats, &vehicle.id);
    vehicle.horsepower = take_number(&mut row, Field::Horsepower, &vehicle.id);

    vehicle.images = row
        .remove(Field::Images.as_str())
        .map(|v| split_list(&text_of(&v), |s| s.split(IMAGES_DELIMITER).collect()))
        .unwrap_or_default();
    vehicle.features = row
        .remove(Field::Features.as_str())
        .map(|v| split_list(&text_of(&v), |s| s.split(FEATURES_DELIMITER).collect()))
        .unwrap_or_default();

    vehicle.extra = row
        .into_iter()
        .map(|(key, value)| (key, text_of(&value)))
        .collect::<BTreeMap<_, _>>();

    vehicle
}

/// Parses a numeric-looking string. Empty, non-numeric and non-finite input
/// is `None`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn take_number(row: &mut RawRecord, field: Field, id: &RecordId) -> Option<f64> {
    let value = row.remove(field.as_str())?;
    let parsed = match &value {
        JsonValue::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        other => parse_number(&text_of(other)),
    };
    if parsed.is_none() {
        debug!(record = %id, field = field.as_str(), raw = %value, "non-numeric value treated as missing");
    }
    parsed
}

fn split_list<'a>(raw: &'a str, split: impl Fn(&'a str) -> Vec<&'a str>) -> Vec<String> {
    split(raw)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text form of a JSON scalar. `null` is empty, arrays and objects keep their
/// JSON text.
fn text_of(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
