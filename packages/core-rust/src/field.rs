//! Closed set of vehicle record fields.
//!
//! Every place that addresses a record field by name (facet keys, sort keys,
//! URL parameters, browser events) goes through [`Field`], so an arbitrary
//! string from the outside world is validated once at the boundary instead of
//! being trusted at every access.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A known vehicle record field.
///
/// Serializes to the camelCase column name used by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Condition,
    Year,
    Make,
    Model,
    Trim,
    BodyStyle,
    ExteriorColor,
    InteriorColor,
    Transmission,
    FuelType,
    Drivetrain,
    Engine,
    FuelEconomy,
    Vin,
    Notes,
    Price,
    Miles,
    Seats,
    Horsepower,
    Images,
    Features,
}

/// Fields that get a facet, in display order.
pub const FILTERABLE_FIELDS: [Field; 10] = [
    Field::Condition,
    Field::Year,
    Field::Make,
    Field::Model,
    Field::Trim,
    Field::BodyStyle,
    Field::ExteriorColor,
    Field::InteriorColor,
    Field::Transmission,
    Field::FuelType,
];

/// Fields offered in the sort menu, in display order.
pub const SORTABLE_FIELDS: [Field; 4] = [Field::Year, Field::Price, Field::Miles, Field::Horsepower];

/// Broad value shape of a field after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, compared with natural ordering.
    Text,
    /// Parsed number; missing when the source value was not numeric.
    Number,
    /// Ordered list of strings (images, features).
    List,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: [Field; 22] = [
        Field::Id,
        Field::Condition,
        Field::Year,
        Field::Make,
        Field::Model,
        Field::Trim,
        Field::BodyStyle,
        Field::ExteriorColor,
        Field::InteriorColor,
        Field::Transmission,
        Field::FuelType,
        Field::Drivetrain,
        Field::Engine,
        Field::FuelEconomy,
        Field::Vin,
        Field::Notes,
        Field::Price,
        Field::Miles,
        Field::Seats,
        Field::Horsepower,
        Field::Images,
        Field::Features,
    ];

    /// Column name in the data source and in URL parameters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Condition => "condition",
            Field::Year => "year",
            Field::Make => "make",
            Field::Model => "model",
            Field::Trim => "trim",
            Field::BodyStyle => "bodyStyle",
            Field::ExteriorColor => "exteriorColor",
            Field::InteriorColor => "interiorColor",
            Field::Transmission => "transmission",
            Field::FuelType => "fuelType",
            Field::Drivetrain => "drivetrain",
            Field::Engine => "engine",
            Field::FuelEconomy => "fuelEconomy",
            Field::Vin => "vin",
            Field::Notes => "notes",
            Field::Price => "price",
            Field::Miles => "miles",
            Field::Seats => "seats",
            Field::Horsepower => "horsepower",
            Field::Images => "images",
            Field::Features => "features",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Price | Field::Miles | Field::Seats | Field::Horsepower => FieldKind::Number,
            Field::Images | Field::Features => FieldKind::List,
            _ => FieldKind::Text,
        }
    }

    /// Whether this field has a facet.
    #[must_use]
    pub fn is_filterable(self) -> bool {
        FILTERABLE_FIELDS.contains(&self)
    }

    /// Whether records can be ordered by this field. List fields cannot.
    #[must_use]
    pub fn is_sortable(self) -> bool {
        self.kind() != FieldKind::List
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_name() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>(), Ok(field));
        }
    }

    #[test]
    fn rejects_unknown_and_wrong_case() {
        assert!("colour".parse::<Field>().is_err());
        assert!("BodyStyle".parse::<Field>().is_err());
        assert!("".parse::<Field>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Field::ExteriorColor).unwrap();
        assert_eq!(json, "\"exteriorColor\"");
        let back: Field = serde_json::from_str("\"fuelType\"").unwrap();
        assert_eq!(back, Field::FuelType);
    }

    #[test]
    fn filterable_fields_are_text() {
        for field in FILTERABLE_FIELDS {
            assert_eq!(field.kind(), FieldKind::Text, "{field}");
            assert!(field.is_filterable());
        }
        assert!(!Field::Price.is_filterable());
    }

    #[test]
    fn list_fields_are_not_sortable() {
        assert!(!Field::Images.is_sortable());
        assert!(!Field::Features.is_sortable());
        for field in SORTABLE_FIELDS {
            assert!(field.is_sortable());
        }
    }
}
