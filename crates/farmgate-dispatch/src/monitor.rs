// farmgate-dispatch/src/monitor.rs
// ============================================================================
// Module: Farmgate Monitor Sinks
// Description: Observability sinks for structured monitor events.
// Purpose: Emit JSON-line records without hard logging dependencies.
// Dependencies: farmgate-core, serde_json, std
// ============================================================================

//! ## Overview
//! Monitor sinks record [`MonitorEvent`] payloads as JSON lines. They are
//! intentionally lightweight so deployments can route events to their
//! preferred logging pipeline without redesign. Recording is infallible; a
//! sink that cannot write drops the record rather than failing the request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use farmgate_core::EventMonitor;
use farmgate_core::MonitorEvent;

// ============================================================================
// SECTION: Stderr Monitor
// ============================================================================

/// Monitor sink that logs JSON lines to stderr.
pub struct StderrMonitor;

impl EventMonitor for StderrMonitor {
    fn record(&self, event: &MonitorEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            #[allow(clippy::print_stderr, reason = "Stderr is this sink's destination.")]
            {
                eprintln!("{payload}");
            }
        }
    }
}

// ============================================================================
// SECTION: Writer Monitor
// ============================================================================

/// Monitor sink that logs JSON lines to an arbitrary writer.
pub struct WriterMonitor<W: Write + Send> {
    /// Output writer for records.
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterMonitor<W> {
    /// Creates a monitor over a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> EventMonitor for WriterMonitor<W> {
    fn record(&self, event: &MonitorEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        let Ok(mut guard) = self.writer.lock() else {
            return;
        };
        let _ = guard.write_all(payload.as_bytes());
        let _ = guard.write_all(b"\n");
    }
}

// ============================================================================
// SECTION: Noop Monitor
// ============================================================================

/// No-op monitor sink for tests.
pub struct NoopMonitor;

impl EventMonitor for NoopMonitor {
    fn record(&self, _event: &MonitorEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions."
    )]

    use std::sync::Arc;
    use std::sync::Mutex;

    use farmgate_core::EventMonitor;
    use farmgate_core::MonitorEvent;

    use super::WriterMonitor;

    /// Writer fixture sharing its buffer with the test.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn records_carry_the_event_label() {
        let buffer = SharedBuffer::default();
        let monitor = WriterMonitor::new(buffer.clone());
        monitor.record(&MonitorEvent::NotificationReceived {
            subscription_type: "Alert".to_string(),
            payload: serde_json::json!({"data": []}),
        });
        let raw = buffer.0.lock().expect("buffer lock").clone();
        let line = String::from_utf8(raw).expect("utf8");
        let record: serde_json::Value = serde_json::from_str(line.trim()).expect("json line");
        assert_eq!(record["event"], "notification_received");
        assert_eq!(record["subscription_type"], "Alert");
    }
}
