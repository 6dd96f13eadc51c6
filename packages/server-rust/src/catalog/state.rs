//! The shared catalog slot.
//!
//! Handlers read the current [`CatalogStatus`] lock-free through `ArcSwap`.
//! Loads run in the background and publish a whole new status when done;
//! the previous catalog keeps serving until then.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use showroom_core::{Catalog, LoadError, SheetSource};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Lifecycle of the catalog as seen by page handlers.
#[derive(Debug, Clone)]
pub enum CatalogStatus {
    /// First load still in flight.
    Loading,
    /// A catalog is available.
    Ready(Arc<Catalog>),
    /// The last load failed and nothing was ever loaded.
    Failed(String),
}

impl CatalogStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }
}

/// Owns the sheet source and the currently published catalog.
pub struct CatalogHandle {
    source: Arc<dyn SheetSource>,
    status: ArcSwap<CatalogStatus>,
    generation: AtomicU64,
}

impl CatalogHandle {
    #[must_use]
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Self {
            source,
            status: ArcSwap::from_pointee(CatalogStatus::Loading),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current status.
    #[must_use]
    pub fn status(&self) -> Arc<CatalogStatus> {
        self.status.load_full()
    }

    /// Publishes an already built catalog.
    pub fn publish(&self, catalog: Catalog) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.status.store(Arc::new(CatalogStatus::Ready(Arc::new(catalog))));
    }

    /// Loads the catalog from the source and publishes the outcome.
    ///
    /// A failure after a successful load keeps the previous catalog. When
    /// loads overlap only the most recently started one may publish.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] of a failed load.
    pub async fn load(&self) -> Result<(), LoadError> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let outcome = Catalog::load(self.source.as_ref()).await;

        if self.generation.load(Ordering::Acquire) != generation {
            info!(generation, "discarding superseded catalog load");
            return outcome.map(|_| ());
        }

        match outcome {
            Ok(catalog) => {
                self.status.store(Arc::new(CatalogStatus::Ready(Arc::new(catalog))));
                Ok(())
            }
            Err(e) => {
                error!(source = %self.source.describe(), error = %e, "catalog load failed");
                if self.status.load().catalog().is_none() {
                    self.status.store(Arc::new(CatalogStatus::Failed(e.to_string())));
                }
                Err(e)
            }
        }
    }

    /// Runs [`load`](Self::load) on the runtime. Errors are logged by `load`.
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let handle = Arc::clone(self);
        tokio::spawn(async move {
            let _ = handle.load().await;
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;

    /// Serves queued results in order; repeats the last one afterwards.
    struct ScriptedSource {
        results: Mutex<Vec<Result<serde_json::Value, String>>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<Result<serde_json::Value, String>>) -> Self {
            Self {
                results: Mutex::new(results),
            }
        }
    }

    #[async_trait]
    impl SheetSource for ScriptedSource {
        async fn fetch(&self) -> Result<serde_json::Value, LoadError> {
            let mut results = self.results.lock();
            let next = if results.len() > 1 {
                results.remove(0)
            } else {
                results[0].clone()
            };
            next.map_err(LoadError::Transport)
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn sheet(ids: &[&str]) -> serde_json::Value {
        let data: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
        json!({ ":type": "sheet", "data": data })
    }

    #[tokio::test]
    async fn starts_loading_then_ready() {
        let handle = CatalogHandle::new(Arc::new(ScriptedSource::new(vec![Ok(sheet(&["1", "2"]))])));
        assert_eq!(handle.status().as_str(), "loading");

        handle.load().await.unwrap();
        let status = handle.status();
        assert_eq!(status.as_str(), "ready");
        assert_eq!(status.catalog().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn first_failure_is_published() {
        let handle = CatalogHandle::new(Arc::new(ScriptedSource::new(vec![Err("refused".into())])));
        assert!(handle.load().await.is_err());
        assert!(matches!(&*handle.status(), CatalogStatus::Failed(msg) if msg.contains("refused")));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_catalog() {
        let handle = CatalogHandle::new(Arc::new(ScriptedSource::new(vec![
            Ok(sheet(&["1"])),
            Err("timeout".into()),
        ])));
        handle.load().await.unwrap();
        assert!(handle.load().await.is_err());
        assert_eq!(handle.status().catalog().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn spawned_load_publishes() {
        let handle = Arc::new(CatalogHandle::new(Arc::new(ScriptedSource::new(vec![Ok(
            sheet(&["a", "b", "c"]),
        )]))));
        handle.spawn_load().await.unwrap();
        assert_eq!(handle.status().catalog().unwrap().len(), 3);
    }

    #[test]
    fn publish_replaces_status() {
        let handle = CatalogHandle::new(Arc::new(ScriptedSource::new(vec![Ok(sheet(&[]))])));
        handle.publish(Catalog::new(Vec::new()));
        assert_eq!(handle.status().as_str(), "ready");
    }
}
