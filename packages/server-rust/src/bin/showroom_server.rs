//! Showroom server entry point.
//!
//! Binds the listener first so health probes answer immediately, loads the
//! catalog in the background, and shuts down gracefully on Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use showroom_server::observability::init_logging;
use showroom_server::{CatalogHandle, HttpSheetSource, NetworkModule, ServerArgs};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_logging(args.log_format);

    let source = HttpSheetSource::new(&args.catalog_config()).context("configuring catalog source")?;
    let catalog = Arc::new(CatalogHandle::new(Arc::new(source)));

    let mut network = NetworkModule::new(args.network_config(), Arc::clone(&catalog));
    let port = network.start().await?;
    info!(port, source = %args.source_url, "showroom server starting");

    catalog.spawn_load();

    network
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
            }
            info!("shutdown signal received");
        })
        .await
}
