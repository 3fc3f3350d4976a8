//! Sidecar External Plugin Protocol
//!
//! This crate defines the JSON-RPC protocol spoken between a host
//! application and sidecar plugins running as separate processes.
//!
//! # Protocol Overview
//!
//! Communication occurs over stdio, one JSON object per line, following
//! JSON-RPC 2.0 envelope conventions. Diagnostics go to stderr and are
//! never part of the protocol.
//!
//! ## Methods
//!
//! - `metadata` - Get plugin metadata
//! - `matches` - Check if plugin claims this message
//! - `handle` - Handle an event
//! - `lifecycle` - Lifecycle events (startup/shutdown/bot_connect)

mod rpc;
mod types;

pub use rpc::*;
pub use types::*;

/// Protocol version
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// JSON-RPC version
pub const JSONRPC_VERSION: &str = "2.0";
