//! The `handle` command dispatcher
//!
//! A small routing table keyed on the normalized command text. No state
//! survives between calls; apart from `/time`'s clock read every branch is
//! a pure function of its input.

use chrono::Local;
use sidecar_protocol::{HandleParams, HandleResult};

const PONG_REPLY: &str = "Pong! (from sidecar plugin)";

const ECHO_USAGE: &str = "Usage: /echo <text>";

const HELP_REPLY: &str = "Available commands:\n\
/ping  - Pong test\n\
/echo <text>  - Echo back text\n\
/time  - Show current time\n\
/help  - This message";

/// Process one message and produce a reply.
///
/// Every branch handles and blocks; the unknown-command arm can only fire
/// if the host calls `handle` for text the matcher never claimed.
pub fn handle(params: &HandleParams) -> HandleResult {
    let text = params.text.trim();

    let reply = if text == "/ping" {
        PONG_REPLY.to_string()
    } else if let Some(rest) = text.strip_prefix("/echo") {
        let content = rest.trim();
        if content.is_empty() {
            ECHO_USAGE.to_string()
        } else {
            format!("Echo: {content}")
        }
    } else if text == "/time" || text == "/now" {
        format!(
            "Current time: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )
    } else if text == "/help" || text == "/?" {
        HELP_REPLY.to_string()
    } else {
        format!("Unknown command: {text}")
    };

    HandleResult::reply(reply)
}
