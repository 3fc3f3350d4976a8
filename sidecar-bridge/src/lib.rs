//! Host-side bridge for sidecar external plugins
//!
//! Spawns plugin processes declared in configuration and drives them over
//! the line-delimited JSON-RPC protocol from `sidecar-protocol`: one line
//! of stdin per request, one line of stdout per response, stderr reserved
//! for diagnostics. Closing a plugin's stdin is the shutdown signal.
//!
//! ```toml
//! [plugin-host]
//! enabled = true
//!
//! [plugin-host.plugins.py-demo]
//! command = "python3"
//! args = ["-u", "./plugins/demo.py"]
//! ```

pub mod config;
mod process;

use std::collections::HashMap;

use anyhow::Result;
use sidecar_protocol::{HandleResult, LifecycleEvent};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub use config::{ConfigStore, Configurable, HostConfig, PluginConfig};
pub use process::PluginProcess;

/// A message offered to the plugins.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub text: String,
    pub user_id: i64,
    pub message_type: String,
    pub group_id: Option<i64>,
}

impl MessageEvent {
    pub fn private(text: impl Into<String>, user_id: i64) -> Self {
        Self {
            text: text.into(),
            user_id,
            message_type: "private".to_string(),
            group_id: None,
        }
    }
}

/// The plugin host: keeps the running plugin processes and fans events
/// out to them.
#[derive(Default)]
pub struct PluginHost {
    processes: RwLock<HashMap<String, PluginProcess>>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn every configured plugin and deliver its startup event.
    ///
    /// A plugin that fails to spawn or start is logged and skipped; one
    /// broken plugin never prevents the others from running.
    pub async fn start(&self, config: &HostConfig) -> Result<()> {
        if !config.enabled {
            info!("plugin host is disabled");
            return Ok(());
        }

        info!("starting {} external plugins", config.plugins.len());

        let mut processes = self.processes.write().await;

        for (name, plugin_config) in &config.plugins {
            match PluginProcess::spawn(plugin_config) {
                Ok(process) => {
                    match process.fetch_metadata().await {
                        Ok(meta) => {
                            info!("plugin {name} is {} v{}", meta.name, meta.version);
                        }
                        Err(e) => warn!("failed to fetch metadata from {name}: {e}"),
                    }
                    if let Err(e) = process.send_lifecycle(LifecycleEvent::Startup).await {
                        warn!("failed to send startup to {name}: {e}");
                    }
                    processes.insert(name.clone(), process);
                    info!("external plugin {name} started");
                }
                Err(e) => {
                    warn!("failed to start external plugin {name}: {e}");
                }
            }
        }

        Ok(())
    }

    /// Notify every plugin that a bot identity connected.
    pub async fn notify_bot_connect(&self, self_id: i64) {
        let processes = self.processes.read().await;
        for (name, process) in processes.iter() {
            if let Err(e) = process
                .send_lifecycle(LifecycleEvent::BotConnect { self_id })
                .await
            {
                warn!("bot_connect to {name} failed: {e}");
            }
        }
    }

    /// Offer a message to the plugins in turn.
    ///
    /// The first plugin that claims the message and answers with
    /// `block = true` ends the fan-out and its result is returned. Per-call
    /// failures are logged and the next plugin is tried.
    pub async fn dispatch(&self, event: &MessageEvent) -> Option<HandleResult> {
        let processes = self.processes.read().await;

        if processes.is_empty() {
            return None;
        }

        for (name, process) in processes.iter() {
            match process.call_matches(event).await {
                Ok(true) => {
                    debug!("external plugin {name} matches");
                    match process.call_handle(event).await {
                        Ok(result) if result.block => return Some(result),
                        Ok(_) => {}
                        Err(e) => warn!("external plugin {name} handle error: {e}"),
                    }
                }
                Ok(false) => debug!("external plugin {name} does not match"),
                Err(e) => warn!("external plugin {name} matches error: {e}"),
            }
        }

        None
    }

    /// Send shutdown to every plugin, then kill what remains.
    pub async fn shutdown(&self) {
        info!("shutting down external plugins");

        let mut processes = self.processes.write().await;

        for (name, process) in processes.drain() {
            info!("stopping external plugin {name}");

            if let Err(e) = process.send_shutdown().await {
                warn!("failed to send shutdown to {name}: {e}");
            }

            if let Err(e) = process.kill().await {
                warn!("failed to kill {name}: {e}");
            }
        }
    }
}
