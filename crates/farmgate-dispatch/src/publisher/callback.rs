// farmgate-dispatch/src/publisher/callback.rs
// ============================================================================
// Module: Farmgate Callback Publisher
// Description: Callback-based publisher for synchronous delivery.
// Purpose: Invoke a user-provided function with each broadcast event.
// Dependencies: farmgate-core, std
// ============================================================================

//! ## Overview
//! [`CallbackPublisher`] delivers events by invoking a user-supplied
//! function. Tests and embedders use it to observe the broadcast stream
//! without a channel.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use farmgate_core::BroadcastEvent;
use farmgate_core::PublishError;
use farmgate_core::Publisher;

// ============================================================================
// SECTION: Callback Publisher
// ============================================================================

/// Callback-based broadcast publisher.
#[derive(Clone)]
pub struct CallbackPublisher {
    /// Handler invoked with each event.
    handler: Arc<CallbackHandler>,
}

/// Callback handler signature used by the publisher.
type CallbackHandler = dyn Fn(&BroadcastEvent) -> Result<(), PublishError> + Send + Sync;

impl CallbackPublisher {
    /// Creates a callback publisher from a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&BroadcastEvent) -> Result<(), PublishError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl Publisher for CallbackPublisher {
    fn publish(&self, event: &BroadcastEvent) -> Result<(), PublishError> {
        (self.handler)(event)
    }
}
