//! The dispatch loop
//!
//! Reads one request, routes it by method name, writes exactly one
//! response, and repeats until the input stream closes. Strictly
//! synchronous: the only suspension point is the blocking read, so
//! responses always come back in request order, one-to-one.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sidecar_protocol::{
    methods, HandleParams, LifecycleParams, MatchesParams, RequestId, RpcError, RpcRequest,
    RpcResponse,
};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::logging::LogSink;
use crate::transport::{Inbound, Transport, TransportError};
use crate::{handler, lifecycle, matcher, registry};

pub struct PluginEngine {
    log: Arc<dyn LogSink>,
}

impl PluginEngine {
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        Self { log }
    }

    /// Route a single request to a single response.
    ///
    /// Unknown methods answer `-32601`, undecodable params `-32602`; the
    /// request's id is echoed verbatim on every path, null included.
    pub fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let RpcRequest {
            method, params, id, ..
        } = request;

        match method.as_str() {
            methods::METADATA => respond(&registry::metadata(), id),
            methods::MATCHES => match decode::<MatchesParams>(&params) {
                Ok(p) => respond(&matcher::matches(&p), id),
                Err(e) => RpcResponse::failure(e, id),
            },
            methods::HANDLE => match decode::<HandleParams>(&params) {
                Ok(p) => respond(&handler::handle(&p), id),
                Err(e) => RpcResponse::failure(e, id),
            },
            methods::LIFECYCLE => match decode::<LifecycleParams>(&params) {
                Ok(p) => respond(&lifecycle::on_lifecycle(&p.event, self.log.as_ref()), id),
                Err(e) => RpcResponse::failure(e, id),
            },
            other => RpcResponse::failure(RpcError::method_not_found(other), id),
        }
    }

    /// Run until end-of-stream.
    ///
    /// A line that fails to parse is skipped with a log line and no
    /// response (there is no valid id to answer). A failed write is fatal:
    /// once the output stream is gone no response can ever reach the host.
    pub async fn run<R, W>(&self, transport: &mut Transport<R, W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let request = match transport.read_request().await {
                Ok(Inbound::Request(request)) => request,
                Ok(Inbound::Eof) => {
                    self.log.record("input closed, exiting");
                    return Ok(());
                }
                Err(TransportError::Parse(e)) => {
                    self.log.record(&format!("skipping malformed line: {e}"));
                    continue;
                }
                Err(TransportError::Io(e)) => {
                    // A broken stdin cannot make progress; treat like EOF.
                    self.log.record(&format!("input stream failed, exiting: {e}"));
                    return Ok(());
                }
            };

            let response = self.dispatch(request);
            transport
                .write_response(&response)
                .await
                .context("failed to write response")?;
        }
    }
}

fn respond<T: Serialize>(result: &T, id: RequestId) -> RpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => RpcResponse::success(value, id),
        Err(_) => RpcResponse::failure(RpcError::internal_error(), id),
    }
}

fn decode<P: DeserializeOwned>(params: &serde_json::Value) -> Result<P, RpcError> {
    // Omitted params deserialize as an empty object, as hosts expect.
    let value = if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(value).map_err(|e| RpcError::invalid_params(e.to_string()))
}
