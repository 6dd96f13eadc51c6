//! Normalized vehicle records and field-level value access.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Opaque record identifier assigned by the data source.
///
/// Numeric ids are kept in their textual form so that `7` and `"7"` from
/// different sheets address the same record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One normalized inventory item.
///
/// Built in bulk by [`normalize`](crate::normalize) and never mutated
/// afterwards. Text fields are empty when the source had no value; numeric
/// fields are `None` when the source value was missing or not a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: RecordId,
    pub condition: String,
    pub year: String,
    pub make: String,
    pub model: String,
    pub trim: String,
    pub body_style: String,
    pub exterior_color: String,
    pub interior_color: String,
    pub transmission: String,
    pub fuel_type: String,
    pub drivetrain: String,
    pub engine: String,
    pub fuel_economy: String,
    pub vin: String,
    pub notes: String,
    pub price: Option<f64>,
    pub miles: Option<f64>,
    pub seats: Option<f64>,
    pub horsepower: Option<f64>,
    pub images: Vec<String>,
    pub features: Vec<String>,
    /// Source columns with no dedicated field, kept verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Borrowed view of a single field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(Option<f64>),
    List(&'a [String]),
}

impl<'a> FieldValue<'a> {
    /// Whether the value counts as absent for filtering and sorting.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// Text form used for facet membership. `None` when missing.
    #[must_use]
    pub fn as_facet_value(&self) -> Option<Cow<'a, str>> {
        match *self {
            FieldValue::Text(s) if !s.is_empty() => Some(Cow::Borrowed(s)),
            FieldValue::Number(Some(n)) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }
}

impl Vehicle {
    /// Returns the value of `field` on this record.
    #[must_use]
    pub fn field(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Id => FieldValue::Text(self.id.as_str()),
            Field::Condition => FieldValue::Text(&self.condition),
            Field::Year => FieldValue::Text(&self.year),
            Field::Make => FieldValue::Text(&self.make),
            Field::Model => FieldValue::Text(&self.model),
            Field::Trim => FieldValue::Text(&self.trim),
            Field::BodyStyle => FieldValue::Text(&self.body_style),
            Field::ExteriorColor => FieldValue::Text(&self.exterior_color),
            Field::InteriorColor => FieldValue::Text(&self.interior_color),
            Field::Transmission => FieldValue::Text(&self.transmission),
            Field::FuelType => FieldValue::Text(&self.fuel_type),
            Field::Drivetrain => FieldValue::Text(&self.drivetrain),
            Field::Engine => FieldValue::Text(&self.engine),
            Field::FuelEconomy => FieldValue::Text(&self.fuel_economy),
            Field::Vin => FieldValue::Text(&self.vin),
            Field::Notes => FieldValue::Text(&self.notes),
            Field::Price => FieldValue::Number(self.price),
            Field::Miles => FieldValue::Number(self.miles),
            Field::Seats => FieldValue::Number(self.seats),
            Field::Horsepower => FieldValue::Number(self.horsepower),
            Field::Images => FieldValue::List(&self.images),
            Field::Features => FieldValue::List(&self.features),
        }
    }

    /// Lowercased `"{year} {make} {model} {trim}"`, the free-text search haystack.
    #[must_use]
    pub fn search_haystack(&self) -> String {
        format!("{} {} {} {}", self.year, self.make, self.model, self.trim).to_lowercase()
    }
}

/// Natural ordering of two strings: numeric values compare numerically and
/// sort before any non-numeric text; text compares lexicographically.
///
/// Total over all inputs, so it is safe to hand to `sort_by`.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Three-way comparison of two present values of the same field.
///
/// Returns `None` when either side is missing or the shapes differ; the
/// caller decides where missing values go.
#[must_use]
pub fn compare_present(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Option<Ordering> {
    if a.is_missing() || b.is_missing() {
        return None;
    }
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => Some(natural_cmp(x, y)),
        (FieldValue::Number(Some(x)), FieldValue::Number(Some(y))) => Some(x.total_cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn civic() -> Vehicle {
        Vehicle {
            id: RecordId::from("1"),
            year: "2020".to_string(),
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            trim: "EX".to_string(),
            price: Some(20_000.0),
            ..Vehicle::default()
        }
    }

    #[test]
    fn field_access_matches_struct() {
        let car = civic();
        assert_eq!(car.field(Field::Make), FieldValue::Text("Honda"));
        assert_eq!(car.field(Field::Price), FieldValue::Number(Some(20_000.0)));
        assert_eq!(car.field(Field::Miles), FieldValue::Number(None));
        assert!(car.field(Field::Miles).is_missing());
        assert!(car.field(Field::Condition).is_missing());
    }

    #[test]
    fn default_vehicle_has_empty_id() {
        let blank = Vehicle::default();
        assert_eq!(blank.id, RecordId::default());
        assert_eq!(blank.id.as_str(), "");
        assert!(blank.field(Field::Price).is_missing());
    }

    #[test]
    fn haystack_is_lowercase_and_space_joined() {
        assert_eq!(civic().search_haystack(), "2020 honda civic ex");
    }

    #[test]
    fn facet_value_of_number_drops_fraction_zero() {
        assert_eq!(
            FieldValue::Number(Some(300.0)).as_facet_value().as_deref(),
            Some("300")
        );
        assert_eq!(FieldValue::Text("").as_facet_value(), None);
    }

    #[test]
    fn natural_cmp_orders_numbers_numerically() {
        assert_eq!(natural_cmp("9", "10"), Ordering::Less);
        assert_eq!(natural_cmp("2019", "2020"), Ordering::Less);
        assert_eq!(natural_cmp("Accord", "Civic"), Ordering::Less);
        assert_eq!(natural_cmp("10", "Accord"), Ordering::Less);
        assert_eq!(natural_cmp("Accord", "10"), Ordering::Greater);
    }

    #[test]
    fn natural_cmp_puts_numbers_before_mixed_text() {
        let mut models = vec!["2500HD", "300", "1500"];
        models.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(models, vec!["300", "1500", "2500HD"]);

        assert_eq!(natural_cmp("300", "1500"), Ordering::Less);
        assert_eq!(natural_cmp("1500", "2500HD"), Ordering::Less);
        assert_eq!(natural_cmp("300", "2500HD"), Ordering::Less);
    }

    #[test]
    fn natural_cmp_breaks_numeric_ties_by_text() {
        assert_eq!(natural_cmp("5", "5.0"), "5".cmp("5.0"));
        assert_eq!(natural_cmp("7", "7"), Ordering::Equal);
    }

    fn mixed_value() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..3000).prop_map(|n| n.to_string()),
            (0u32..3000, "[A-Z]{1,2}").prop_map(|(n, suffix)| format!("{n}{suffix}")),
            "[A-Za-z ]{0,4}",
            Just(" 42 ".to_string()),
            Just("inf".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn natural_cmp_is_transitive(a in mixed_value(), b in mixed_value(), c in mixed_value()) {
            if natural_cmp(&a, &b) != Ordering::Greater && natural_cmp(&b, &c) != Ordering::Greater {
                prop_assert_ne!(natural_cmp(&a, &c), Ordering::Greater);
            }
            prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
        }

        #[test]
        fn sorting_mixed_values_never_panics(mut values in proptest::collection::vec(mixed_value(), 0..200)) {
            values.sort_by(|a, b| natural_cmp(a, b));
            for pair in values.windows(2) {
                prop_assert_ne!(natural_cmp(&pair[0], &pair[1]), Ordering::Greater);
            }
        }
    }

    #[test]
    fn compare_present_refuses_missing() {
        let present = FieldValue::Number(Some(1.0));
        let missing = FieldValue::Number(None);
        assert_eq!(compare_present(&present, &missing), None);
        assert_eq!(
            compare_present(&present, &FieldValue::Number(Some(2.0))),
            Some(Ordering::Less)
        );
    }
}
