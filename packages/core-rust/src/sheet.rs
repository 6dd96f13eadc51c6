//! Sheet payloads delivered by the data source.
//!
//! Two shapes exist, discriminated by the `:type` member:
//!
//! ```json
//! { ":type": "sheet", "total": 2, "offset": 0, "limit": 2, "data": [ ... ] }
//! { ":type": "multi-sheet", ":names": ["new", "used"], ":version": 3,
//!   "new": { "data": [ ... ] }, "used": { "data": [ ... ] } }
//! ```
//!
//! Multi-sheet rows are concatenated in `:names` order.

use serde_json::Value as JsonValue;

use crate::error::LoadError;
use crate::normalize::RawRecord;

/// `:type` of a single-sheet payload.
pub const SINGLE_SHEET: &str = "sheet";

/// `:type` of a multi-sheet payload.
pub const MULTI_SHEET: &str = "multi-sheet";

/// Extracts every raw row from a payload.
///
/// # Errors
///
/// Returns [`LoadError::UnknownSheetType`] when `:type` is missing or
/// unrecognized, and [`LoadError::Malformed`] when the payload does not have
/// the shape its type promises. A row that is not a JSON object is malformed.
pub fn rows_from_payload(payload: JsonValue) -> Result<Vec<RawRecord>, LoadError> {
    let JsonValue::Object(mut payload) = payload else {
        return Err(LoadError::Malformed("payload is not a JSON object".into()));
    };

    let sheet_type = payload
        .get(":type")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();

    match sheet_type.as_str() {
        SINGLE_SHEET => take_rows(payload.remove("data"), "data"),
        MULTI_SHEET => {
            let names = payload
                .remove(":names")
                .and_then(|names| match names {
                    JsonValue::Array(items) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| LoadError::Malformed("multi-sheet payload has no :names array".into()))?;

            let mut rows = Vec::new();
            for name in names {
                let name = name
                    .as_str()
                    .ok_or_else(|| LoadError::Malformed(format!("sheet name is not a string: {name}")))?
                    .to_string();
                let sheet = payload
                    .remove(&name)
                    .ok_or_else(|| LoadError::Malformed(format!("named sheet {name:?} is missing")))?;
                let data = match sheet {
                    JsonValue::Object(mut sheet) => sheet.remove("data"),
                    _ => None,
                };
                rows.extend(take_rows(data, &name)?);
            }
            Ok(rows)
        }
        other => Err(LoadError::UnknownSheetType(other.to_string())),
    }
}

/// Parses a response body and extracts its rows.
///
/// # Errors
///
/// Returns [`LoadError::Json`] for invalid JSON, otherwise as
/// [`rows_from_payload`].
pub fn rows_from_slice(body: &[u8]) -> Result<Vec<RawRecord>, LoadError> {
    rows_from_payload(serde_json::from_slice(body)?)
}

fn take_rows(data: Option<JsonValue>, sheet: &str) -> Result<Vec<RawRecord>, LoadError> {
    let Some(JsonValue::Array(items)) = data else {
        return Err(LoadError::Malformed(format!("sheet {sheet:?} has no data array")));
    };
    items
        .into_iter()
        .map(|item| match item {
            JsonValue::Object(row) => Ok(row),
            other => Err(LoadError::Malformed(format!(
                "row in sheet {sheet:?} is not an object: {other}"
            ))),
        })
        .collect()
}
