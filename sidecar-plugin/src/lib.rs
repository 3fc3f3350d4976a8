//! Sidecar plugin process
//!
//! A standalone plugin that talks to its host over stdin/stdout using
//! line-delimited JSON-RPC (see `sidecar-protocol`). The host sends one
//! request per line and reads exactly one response per line; everything the
//! plugin prints for humans goes to stderr.
//!
//! The crate is split the way the protocol methods are:
//!
//! - [`transport`] - line framing over the stdio streams
//! - [`registry`] - the static command table answering `metadata`
//! - [`matcher`] - the `matches` claim predicate
//! - [`handler`] - the `handle` command dispatcher
//! - [`lifecycle`] - `lifecycle` notifications
//! - [`engine`] - the top-level read/route/respond loop

pub mod engine;
pub mod handler;
pub mod lifecycle;
pub mod logging;
pub mod matcher;
pub mod registry;
pub mod transport;
