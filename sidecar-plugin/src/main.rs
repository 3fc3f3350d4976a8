use std::sync::Arc;

use anyhow::Result;
use sidecar_plugin::engine::PluginEngine;
use sidecar_plugin::logging::TracingLog;
use sidecar_plugin::transport::Transport;
use tracing_subscriber::EnvFilter;

// One request in flight at a time, so a current-thread runtime is all the
// loop needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout is the protocol stream; diagnostics must go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("starting sidecar demo plugin");

    let engine = PluginEngine::new(Arc::new(TracingLog));
    let mut transport = Transport::stdio();
    engine.run(&mut transport).await
}
