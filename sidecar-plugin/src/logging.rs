//! Diagnostic log sink
//!
//! Components that log (the lifecycle manager, the dispatch loop) take an
//! explicit sink instead of writing to a process-wide stream, so unit tests
//! can capture their output deterministically.

use std::sync::Mutex;

pub trait LogSink: Send + Sync {
    fn record(&self, line: &str);
}

/// Production sink: forwards to the tracing subscriber, which the binary
/// points at stderr (stdout carries the protocol).
#[derive(Debug, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn record(&self, line: &str) {
        tracing::info!("{line}");
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemoryLog {
    fn record(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut guard) => guard.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}
