use async_trait::async_trait;

use crate::error::LoadError;

/// Transport that delivers the raw sheet payload.
///
/// The one asynchronous boundary of the system: everything downstream of a
/// fetched payload is synchronous. Implementations: HTTP (server crate),
/// fixed payloads (tests).
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Fetch the whole catalog payload. No retries: a failure is final for
    /// this load.
    async fn fetch(&self) -> Result<serde_json::Value, LoadError>;

    /// Human-readable description of where the data comes from, for logs.
    fn describe(&self) -> String;
}
