// farmgate-dispatch/src/publisher/broadcast.rs
// ============================================================================
// Module: Farmgate Broadcast Publisher
// Description: Channel-backed publisher for connected listeners.
// Purpose: Push broadcast events through a Tokio broadcast channel.
// Dependencies: farmgate-core, tokio
// ============================================================================

//! ## Overview
//! [`BroadcastPublisher`] pushes events into a `tokio::sync::broadcast`
//! channel that every connected listener subscribes to. Publishing is
//! fire-and-forget: a channel without listeners accepts the event and drops
//! it, which is not a delivery failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use farmgate_core::BroadcastEvent;
use farmgate_core::PublishError;
use farmgate_core::Publisher;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::Sender;
use tokio::sync::broadcast::channel;

// ============================================================================
// SECTION: Broadcast Publisher
// ============================================================================

/// Channel-backed broadcast publisher.
///
/// # Invariants
/// - Concurrent publishes never corrupt message content; ordering across
///   concurrent webhook calls is not guaranteed.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    /// Sender side of the listener channel.
    sender: Sender<BroadcastEvent>,
}

impl BroadcastPublisher {
    /// Creates a publisher with a bounded channel.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = channel(capacity);
        Self {
            sender,
        }
    }

    /// Creates a publisher over an existing sender.
    #[must_use]
    pub const fn with_sender(sender: Sender<BroadcastEvent>) -> Self {
        Self {
            sender,
        }
    }

    /// Subscribes a new listener to the channel.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<BroadcastEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of connected listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Publisher for BroadcastPublisher {
    fn publish(&self, event: &BroadcastEvent) -> Result<(), PublishError> {
        // A send error only means no listener is currently connected.
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
