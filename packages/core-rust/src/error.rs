//! Errors surfaced by catalog loading.
//!
//! Only load failures propagate: normalization gaps and stale state
//! references are absorbed where they occur.

/// Failure to obtain the record collection. Fatal for the catalog generation
/// being loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The transport could not complete the request.
    #[error("request to data source failed: {0}")]
    Transport(String),
    /// The data source answered with a non-success status.
    #[error("data source answered with HTTP status {status}")]
    Status { status: u16 },
    /// The body was not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The `:type` discriminator named neither `sheet` nor `multi-sheet`.
    #[error("unknown sheet-type: {0}")]
    UnknownSheetType(String),
    /// The payload shape did not match its declared sheet type.
    #[error("malformed sheet payload: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cause() {
        assert_eq!(
            LoadError::UnknownSheetType("table".into()).to_string(),
            "unknown sheet-type: table"
        );
        assert_eq!(
            LoadError::Status { status: 404 }.to_string(),
            "data source answered with HTTP status 404"
        );
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(LoadError::from(json_err).to_string().starts_with("payload is not valid JSON"));
    }
}
