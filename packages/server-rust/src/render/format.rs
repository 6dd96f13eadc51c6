//! Text formatting for cards, labels and links.

use std::sync::LazyLock;

use regex::Regex;
use showroom_core::Vehicle;
use url::form_urlencoded;

/// Image shown for records without any.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400";

/// Alt text of [`PLACEHOLDER_IMAGE`].
pub const PLACEHOLDER_ALT: &str = "placeholder image";

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("word boundary pattern is valid"));

/// Formats a number with thousands separators and at most three fraction
/// digits: `20000` → `"20,000"`, `1234.5` → `"1,234.5"`.
#[must_use]
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// `bodyStyle` → `Body Style`.
#[must_use]
pub fn camel_case_to_label(key: &str) -> String {
    let spaced = WORD_BOUNDARY.replace_all(key, "$1 $2");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Card header: `"{year} {make} {model} - {trim}"`.
#[must_use]
pub fn vehicle_header(vehicle: &Vehicle) -> String {
    format!(
        "{} {} {} - {}",
        vehicle.year, vehicle.make, vehicle.model, vehicle.trim
    )
}

/// Details page path. Anything not `new` is listed under `used`.
#[must_use]
pub fn details_link(vehicle: &Vehicle) -> String {
    format!("/inventory/{}/{}", condition_segment(&vehicle.condition), vehicle.id)
}

/// Page hosting the dealership contact form.
pub const CONTACT_PAGE: &str = "/about-us";

/// Anchor of the contact form on [`CONTACT_PAGE`].
pub const CONTACT_ANCHOR: &str = "contact-us";

/// Why a visitor wants to get in touch about a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTopic {
    Availability,
    TestDrive,
}

impl ContactTopic {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContactTopic::Availability => "availability",
            ContactTopic::TestDrive => "test drive",
        }
    }
}

/// Contact form link prefilled with the topic and the vehicle's identity.
/// Empty fields are left out.
#[must_use]
pub fn contact_link(topic: ContactTopic, vehicle: &Vehicle) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("topic", topic.as_str());
    let fields = [
        ("id", vehicle.id.as_str()),
        ("condition", vehicle.condition.as_str()),
        ("year", vehicle.year.as_str()),
        ("make", vehicle.make.as_str()),
        ("model", vehicle.model.as_str()),
        ("trim", vehicle.trim.as_str()),
        ("vin", vehicle.vin.as_str()),
    ];
    for (name, value) in fields {
        if !value.is_empty() {
            query.append_pair(name, value);
        }
    }
    format!("{CONTACT_PAGE}?{}#{CONTACT_ANCHOR}", query.finish())
}

/// Path segment for a condition value.
#[must_use]
pub fn condition_segment(condition: &str) -> &'static str {
    if condition.eq_ignore_ascii_case("new") {
        "new"
    } else {
        "used"
    }
}

/// Whether a price is shown as an amount rather than "TBD".
#[must_use]
pub fn has_price(price: Option<f64>) -> bool {
    price.is_some_and(|p| p > 0.0)
}

/// `"$20,000"`, or `"$ TBD"` when the price is missing or not positive.
#[must_use]
pub fn price_label(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => format!("${}", format_number(p)),
        _ => "$ TBD".to_string(),
    }
}

/// One label/value line of the card's detail list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
    /// CSS colour for a preview swatch; empty when the row has none.
    pub swatch: String,
}

impl DetailRow {
    fn text(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            swatch: String::new(),
        }
    }

    fn color(label: &'static str, color: &str) -> Self {
        Self {
            label,
            value: color.to_string(),
            swatch: color.to_string(),
        }
    }
}

/// Detail rows for a vehicle, skipping every row whose source data is
/// missing.
#[must_use]
pub fn detail_rows(vehicle: &Vehicle) -> Vec<DetailRow> {
    let mut rows = Vec::new();

    if !vehicle.exterior_color.is_empty() {
        rows.push(DetailRow::color("Exterior Color", &vehicle.exterior_color));
    }
    if !vehicle.interior_color.is_empty() {
        rows.push(DetailRow::color("Interior Color", &vehicle.interior_color));
    }
    if let Some(miles) = vehicle.miles.filter(|m| *m > 0.0) {
        rows.push(DetailRow::text("Odometer", format!("{} miles", format_number(miles))));
    }
    if let Some(seats) = vehicle.seats.filter(|s| *s > 0.0) {
        if !vehicle.body_style.is_empty() {
            let noun = if seats > 1.0 { "seats" } else { "seat" };
            rows.push(DetailRow::text(
                "Body/Seating",
                format!("{} /{seats} {noun}", vehicle.body_style),
            ));
        }
    }
    if !vehicle.fuel_economy.is_empty() {
        rows.push(DetailRow::text("Fuel Economy", vehicle.fuel_economy.clone()));
    }
    if !vehicle.transmission.is_empty() {
        rows.push(DetailRow::text("Transmission", vehicle.transmission.clone()));
    }
    if !vehicle.drivetrain.is_empty() {
        let value = match vehicle.horsepower.filter(|hp| *hp > 0.0) {
            Some(hp) => format!("{} ({hp}hp)", vehicle.drivetrain),
            None => vehicle.drivetrain.clone(),
        };
        rows.push(DetailRow::text("Drivetrain", value));
    }
    if !vehicle.engine.is_empty() {
        let value = if vehicle.fuel_type.is_empty() {
            vehicle.engine.clone()
        } else {
            format!("{} ({})", vehicle.engine, vehicle.fuel_type)
        };
        rows.push(DetailRow::text("Engine", value));
    }
    if !vehicle.vin.is_empty() {
        rows.push(DetailRow::text("VIN", vehicle.vin.clone()));
    }
    if !vehicle.body_style.is_empty() {
        rows.push(DetailRow::text("Body Style", vehicle.body_style.clone()));
    }

    rows
}

/// `(src, alt)` of the card image.
#[must_use]
pub fn card_image(vehicle: &Vehicle) -> (String, String) {
    match vehicle.images.first() {
        Some(src) => (src.clone(), format!("Image of {} ", vehicle_header(vehicle))),
        None => (PLACEHOLDER_IMAGE.to_string(), PLACEHOLDER_ALT.to_string()),
    }
}

const FEATURE_ICONS: &[(&str, &[&str])] = &[
    ("air-conditioner", &["temperature control", "climate control"]),
    ("alloy-wheel", &["alloy wheel"]),
    ("app-link", &["sync"]),
    ("bluetooth-signal", &["bluetooth"]),
    ("camera", &["camera"]),
    ("car-driver-seat", &["driver seat"]),
    ("car-seat", &["seat"]),
    ("car-window-down", &["front window", "rear window"]),
    ("compass", &["compass"]),
    (
        "door-mirror",
        &["door mirror", "outside mirror", "blind zone", "side-mirror", "side mirror"],
    ),
    ("headlight", &["headlight", "headlamp", "fog light"]),
    ("park", &["park", "parking"]),
    ("power-plug", &["power outlet"]),
    ("radio", &["radio"]),
    ("rear-wiper", &["rear wiper"]),
    ("rearview-mirror", &["rearview mirror", "rear-view mirror"]),
    ("remote-control", &["remote"]),
    ("security", &["security"]),
    ("sensor", &["sensor", "cross traffic", "cross-traffic"]),
    ("speaker", &["speaker"]),
    ("speed", &["speed"]),
    ("steering-wheel", &["steering wheel"]),
    ("suspension", &["suspension"]),
    ("temperature", &["a/c", "air condition", "temperature"]),
    ("trailer", &["trailer"]),
    ("wireless-communication", &["wireless"]),
];

/// Icon name for a feature line; first match in table order wins.
#[must_use]
pub fn feature_icon(feature: &str) -> &'static str {
    let lower = feature.to_lowercase();
    FEATURE_ICONS
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
        .map_or("check-circle", |(icon, _)| *icon)
}
