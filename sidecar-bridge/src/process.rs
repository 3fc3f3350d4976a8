//! Plugin process management and JSON-RPC calls over its stdio

use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Result};
use sidecar_protocol::{
    methods, HandleParams, HandleResult, LifecycleEvent, LifecycleParams, LifecycleResult,
    MatchesParams, MatchesResult, PluginMetadata, RequestId, RpcRequest, RpcResponse,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::PluginConfig;
use crate::MessageEvent;

/// Per-call timeout; a plugin that stalls longer is treated as failed.
const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// The stdio pair plus the id counter, locked as one unit so a call's
/// write-then-read cannot interleave with another call's.
struct PluginIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

/// A spawned plugin child process.
///
/// One request is in flight at a time: each call holds the io lock from
/// the id allocation through the response read, matching the plugin
/// side's strict request/response ordering.
pub struct PluginProcess {
    child: Mutex<Child>,
    io: Mutex<PluginIo>,
}

impl PluginProcess {
    /// Spawn the plugin. Its stderr is inherited so diagnostics reach the
    /// host's stderr without touching the protocol stream.
    pub fn spawn(config: &PluginConfig) -> Result<Self> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        if let Some(ref cwd) = config.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("failed to capture stdin"))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("failed to capture stdout"))?;

        Ok(Self {
            child: Mutex::new(child),
            io: Mutex::new(PluginIo {
                stdin,
                stdout: BufReader::new(stdout),
                next_id: 1,
            }),
        })
    }

    /// Send one JSON-RPC request line and read one response line.
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let mut io = self.io.lock().await;

        let id = io.next_id;
        io.next_id += 1;

        let request = RpcRequest::new(method, params, id);
        let request_json = serde_json::to_string(&request)?;

        debug!("sending rpc: {request_json}");

        io.stdin.write_all(request_json.as_bytes()).await?;
        io.stdin.write_all(b"\n").await?;
        io.stdin.flush().await?;

        let mut line = String::new();
        let read = timeout(RPC_TIMEOUT, io.stdout.read_line(&mut line))
            .await
            .map_err(|_| anyhow!("rpc call '{method}' timed out after {RPC_TIMEOUT:?}"))??;
        if read == 0 {
            return Err(anyhow!("plugin closed its output during '{method}'"));
        }

        debug!("received rpc: {}", line.trim());

        let response: RpcResponse = serde_json::from_str(&line)?;

        if response.id() != &RequestId::from(id) {
            return Err(anyhow!("response id mismatch for '{method}'"));
        }

        response.into_result().map_err(anyhow::Error::new)
    }

    /// Fetch the plugin's metadata.
    pub async fn fetch_metadata(&self) -> Result<PluginMetadata> {
        let result = self.call(methods::METADATA, serde_json::Value::Null).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Ask whether the plugin claims this message.
    pub async fn call_matches(&self, event: &MessageEvent) -> Result<bool> {
        let params = MatchesParams {
            text: event.text.clone(),
            message_type: event.message_type.clone(),
            user_id: Some(event.user_id),
            group_id: event.group_id,
        };

        let result = self
            .call(methods::MATCHES, serde_json::to_value(&params)?)
            .await?;

        let matches: MatchesResult = serde_json::from_value(result)?;
        Ok(matches.matches)
    }

    /// Hand the message to the plugin.
    pub async fn call_handle(&self, event: &MessageEvent) -> Result<HandleResult> {
        let params = HandleParams {
            message_type: event.message_type.clone(),
            user_id: event.user_id,
            group_id: event.group_id,
            text: event.text.clone(),
            raw_message: event.text.clone(),
            self_id: None,
        };

        let result = self
            .call(methods::HANDLE, serde_json::to_value(&params)?)
            .await?;

        Ok(serde_json::from_value(result)?)
    }

    /// Deliver a lifecycle notification and wait for the acknowledgement.
    pub async fn send_lifecycle(&self, event: LifecycleEvent) -> Result<()> {
        let params = LifecycleParams { event };

        let result = self
            .call(methods::LIFECYCLE, serde_json::to_value(&params)?)
            .await?;

        let ack: LifecycleResult = serde_json::from_value(result)?;
        if !ack.ok {
            warn!("plugin did not acknowledge lifecycle event");
        }
        Ok(())
    }

    /// Best-effort shutdown notification; the process may already be gone.
    pub async fn send_shutdown(&self) -> Result<()> {
        match self.send_lifecycle(LifecycleEvent::Shutdown).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("shutdown event failed (process may be dead): {e}");
                Ok(())
            }
        }
    }

    /// Kill the process.
    pub async fn kill(self) -> Result<()> {
        let mut child = self.child.lock().await;
        child.kill().await?;
        Ok(())
    }
}
