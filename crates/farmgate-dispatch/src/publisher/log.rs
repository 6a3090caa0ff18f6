// farmgate-dispatch/src/publisher/log.rs
// ============================================================================
// Module: Farmgate Log Publisher
// Description: Log-only publisher for audit-grade broadcast records.
// Purpose: Persist broadcast events without pushing to listeners.
// Dependencies: farmgate-core, serde_json, std
// ============================================================================

//! ## Overview
//! `LogPublisher` writes one JSON line per broadcast event. It does not
//! deliver events to listeners; deployments use it to tee the broadcast
//! stream into their logging pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use farmgate_core::BroadcastEvent;
use farmgate_core::PublishError;
use farmgate_core::Publisher;
use serde_json::json;

// ============================================================================
// SECTION: Log Publisher
// ============================================================================

/// Log-only broadcast publisher.
pub struct LogPublisher<W: Write + Send> {
    /// Output writer for log records.
    writer: Mutex<W>,
}

impl<W: Write + Send> LogPublisher<W> {
    /// Creates a log publisher over a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> Publisher for LogPublisher<W> {
    fn publish(&self, event: &BroadcastEvent) -> Result<(), PublishError> {
        let record = json!({
            "channel": event.channel,
            "message": event.message,
        });
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| PublishError::Delivery("log writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, &record)
            .map_err(|err| PublishError::Delivery(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| PublishError::Delivery(err.to_string()))?;
        drop(guard);
        Ok(())
    }
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

    use farmgate_core::BroadcastEvent;
    use farmgate_core::Publisher;

    use super::LogPublisher;

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
    fn events_write_one_json_line_each() {
        let buffer = SharedBuffer::default();
        let publisher = LogPublisher::new(buffer.clone());
        publisher
            .publish(&BroadcastEvent {
                channel: "Sensor".to_string(),
                message: "Alert received".to_string(),
            })
            .expect("publish");
        let raw = buffer.0.lock().expect("buffer lock").clone();
        let line = String::from_utf8(raw).expect("utf8");
        let record: serde_json::Value = serde_json::from_str(line.trim()).expect("json line");
        assert_eq!(record["channel"], "Sensor");
        assert_eq!(record["message"], "Alert received");
    }
}
