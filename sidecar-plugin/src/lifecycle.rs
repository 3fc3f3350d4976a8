//! Lifecycle notifications
//!
//! The plugin holds no protocol state across lifecycle transitions; the
//! only observable effect is a log line per event. Unrecognized tags are
//! logged with the original tag, never rejected.

use sidecar_protocol::{LifecycleEvent, LifecycleResult};

use crate::logging::LogSink;

pub fn on_lifecycle(event: &LifecycleEvent, log: &dyn LogSink) -> LifecycleResult {
    match event {
        LifecycleEvent::Startup => log.record("plugin started"),
        LifecycleEvent::Shutdown => log.record("plugin shutting down"),
        LifecycleEvent::BotConnect { self_id } => {
            log.record(&format!("bot connected: {self_id}"));
        }
        LifecycleEvent::Unknown(tag) => {
            log.record(&format!("unknown lifecycle event: {tag}"));
        }
    }
    LifecycleResult { ok: true }
}
