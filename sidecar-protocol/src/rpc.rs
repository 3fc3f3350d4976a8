//! JSON-RPC envelope types

use serde::{Deserialize, Serialize};

use crate::JSONRPC_VERSION;

/// Request identifier.
///
/// JSON-RPC allows numbers, strings and null; whatever the host sends must
/// be echoed back verbatim on the response, so the id is kept opaque rather
/// than assumed numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    Text(String),
    Null,
}

impl Default for RequestId {
    fn default() -> Self {
        Self::Null
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self::Number(id.into())
    }
}

/// JSON-RPC Request
///
/// `jsonrpc` is assumed "2.0" when a host omits it; only `method` is
/// required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: RequestId,
}

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

impl RpcRequest {
    /// Create a new RPC request
    pub fn new(method: impl Into<String>, params: serde_json::Value, id: impl Into<RequestId>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// JSON-RPC Response
///
/// Exactly one of `result`/`error` is present on the wire, so the response
/// is a closed two-variant type instead of a struct with two options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Success {
        jsonrpc: String,
        result: serde_json::Value,
        id: RequestId,
    },
    Failure {
        jsonrpc: String,
        error: RpcError,
        id: RequestId,
    },
}

impl RpcResponse {
    /// Create a success response
    pub fn success(result: serde_json::Value, id: RequestId) -> Self {
        Self::Success {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result,
            id,
        }
    }

    /// Create an error response
    pub fn failure(error: RpcError, id: RequestId) -> Self {
        Self::Failure {
            jsonrpc: JSONRPC_VERSION.to_string(),
            error,
            id,
        }
    }

    /// The id echoed from the originating request
    pub fn id(&self) -> &RequestId {
        match self {
            Self::Success { id, .. } | Self::Failure { id, .. } => id,
        }
    }

    /// Extract the result, mapping a wire error to `Err`
    pub fn into_result(self) -> Result<serde_json::Value, RpcError> {
        match self {
            Self::Success { result, .. } => Ok(result),
            Self::Failure { error, .. } => Err(error),
        }
    }
}

/// JSON-RPC Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Standard error: Parse error
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Standard error: Invalid request
    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid Request")
    }

    /// Standard error: Method not found
    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, format!("Method not found: {method}"))
    }

    /// Standard error: Invalid params
    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(-32602, format!("Invalid params: {}", detail.into()))
    }

    /// Standard error: Internal error
    pub fn internal_error() -> Self {
        Self::new(-32603, "Internal error")
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// RPC Method names
pub mod methods {
    /// Get plugin metadata
    pub const METADATA: &str = "metadata";
    /// Check if plugin claims the event
    pub const MATCHES: &str = "matches";
    /// Handle an event
    pub const HANDLE: &str = "handle";
    /// Lifecycle events
    pub const LIFECYCLE: &str = "lifecycle";
}
