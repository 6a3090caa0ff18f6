// farmgate-dispatch/src/dispatcher.rs
// ============================================================================
// Module: Farmgate Subscription Dispatcher
// Description: Composite dispatcher wiring the monitor and publisher.
// Purpose: Turn one webhook notification into filtered broadcast events.
// Dependencies: farmgate-core, serde_json
// ============================================================================

//! ## Overview
//! [`SubscriptionDispatcher`] records every inbound notification, leniently
//! parses the payload, and runs the core fan-out over the configured
//! attribute allow-list. The upstream broker is trusted infrastructure: a
//! body that does not match the expected structure dispatches as zero items
//! and is still recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use farmgate_core::DispatchSummary;
use farmgate_core::EventMonitor;
use farmgate_core::MonitorEvent;
use farmgate_core::NotificationPayload;
use farmgate_core::Publisher;
use farmgate_core::SubscriptionType;
use farmgate_core::fan_out;
use serde_json::Value;
use thiserror::Error;

use crate::monitor::NoopMonitor;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned while building the dispatcher.
#[derive(Debug, Error)]
pub enum DispatcherBuildError {
    /// No publisher was configured.
    #[error("dispatcher publisher is not configured")]
    MissingPublisher,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for a subscription dispatcher.
#[derive(Default)]
pub struct SubscriptionDispatcherBuilder {
    /// Attribute allow-list.
    attributes: Vec<String>,
    /// Publisher for broadcast events.
    publisher: Option<Arc<dyn Publisher>>,
    /// Monitor for structured events.
    monitor: Option<Arc<dyn EventMonitor>>,
}

impl SubscriptionDispatcherBuilder {
    /// Sets the attribute allow-list.
    #[must_use]
    pub fn attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Registers the publisher used for broadcast delivery.
    #[must_use]
    pub fn publisher(mut self, publisher: impl Publisher + 'static) -> Self {
        self.publisher = Some(Arc::new(publisher));
        self
    }

    /// Registers the monitor used for structured events.
    #[must_use]
    pub fn monitor(mut self, monitor: impl EventMonitor + 'static) -> Self {
        self.monitor = Some(Arc::new(monitor));
        self
    }

    /// Registers a shared monitor used for structured events.
    #[must_use]
    pub fn shared_monitor(mut self, monitor: Arc<dyn EventMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`DispatcherBuildError::MissingPublisher`] when no publisher
    /// is configured.
    pub fn build(self) -> Result<SubscriptionDispatcher, DispatcherBuildError> {
        Ok(SubscriptionDispatcher {
            attributes: self.attributes,
            publisher: self.publisher.ok_or(DispatcherBuildError::MissingPublisher)?,
            monitor: self.monitor.unwrap_or_else(|| Arc::new(NoopMonitor)),
        })
    }
}

// ============================================================================
// SECTION: Subscription Dispatcher
// ============================================================================

/// Composite dispatcher for inbound context-broker notifications.
///
/// # Invariants
/// - The raw notification is recorded unconditionally, even when zero items
///   match the allow-list.
/// - Publish failures are swallowed per item and never abort later items.
pub struct SubscriptionDispatcher {
    /// Attribute allow-list, fixed at startup.
    attributes: Vec<String>,
    /// Publisher for broadcast events.
    publisher: Arc<dyn Publisher>,
    /// Monitor for structured events.
    monitor: Arc<dyn EventMonitor>,
}

impl SubscriptionDispatcher {
    /// Returns a builder for the dispatcher.
    #[must_use]
    pub fn builder() -> SubscriptionDispatcherBuilder {
        SubscriptionDispatcherBuilder::default()
    }

    /// Dispatches one inbound notification.
    ///
    /// The webhook acknowledges independently of this call's outcome; the
    /// returned summary exists for observability, not for control flow.
    pub fn dispatch(&self, subscription_type: &SubscriptionType, body: &Value) -> DispatchSummary {
        self.monitor.record(&MonitorEvent::NotificationReceived {
            subscription_type: subscription_type.to_string(),
            payload: body.clone(),
        });
        let payload: NotificationPayload =
            serde_json::from_value(body.clone()).unwrap_or_default();
        fan_out(
            subscription_type,
            &payload,
            &self.attributes,
            self.publisher.as_ref(),
            self.monitor.as_ref(),
        )
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
    use farmgate_core::EventMonitor;
    use farmgate_core::MonitorEvent;
    use farmgate_core::SubscriptionType;
    use serde_json::json;

    use super::SubscriptionDispatcher;
    use crate::publisher::CallbackPublisher;

    /// Monitor fixture collecting recorded events.
    #[derive(Default)]
    struct RecordingMonitor {
        /// Events recorded so far.
        events: Mutex<Vec<MonitorEvent>>,
    }

    impl EventMonitor for RecordingMonitor {
        fn record(&self, event: &MonitorEvent) {
            self.events.lock().expect("monitor lock").push(event.clone());
        }
    }

    fn collecting_dispatcher(
        attributes: &[&str],
    ) -> (SubscriptionDispatcher, Arc<Mutex<Vec<BroadcastEvent>>>, Arc<RecordingMonitor>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let monitor = Arc::new(RecordingMonitor::default());
        let dispatcher = SubscriptionDispatcher::builder()
            .attributes(attributes.iter().map(ToString::to_string).collect())
            .publisher(CallbackPublisher::new(move |event: &BroadcastEvent| {
                sink.lock().expect("sink lock").push(event.clone());
                Ok(())
            }))
            .shared_monitor(Arc::clone(&monitor) as Arc<dyn EventMonitor>)
            .build()
            .expect("dispatcher");
        (dispatcher, events, monitor)
    }

    #[test]
    fn notifications_fan_out_per_matching_attribute() {
        let (dispatcher, events, _monitor) = collecting_dispatcher(&["type", "filling"]);
        let summary = dispatcher.dispatch(
            &SubscriptionType::new("Alert"),
            &json!({"data": [{"type": "Sensor", "filling": 80}]}),
        );
        assert_eq!(summary.published, 2);
        let events = events.lock().expect("events lock");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].channel, "Sensor");
        assert_eq!(events[1].channel, "80");
    }

    #[test]
    fn malformed_bodies_dispatch_as_zero_items() {
        let (dispatcher, events, monitor) = collecting_dispatcher(&["type"]);
        let summary =
            dispatcher.dispatch(&SubscriptionType::new("Alert"), &json!("not an object"));
        assert_eq!(summary.items, 0);
        assert_eq!(summary.published, 0);
        assert!(events.lock().expect("events lock").is_empty());
        // The raw event is still recorded.
        let recorded = monitor.events.lock().expect("monitor lock");
        assert!(matches!(
            recorded.as_slice(),
            [MonitorEvent::NotificationReceived {
                subscription_type,
                ..
            }] if subscription_type == "Alert"
        ));
    }

    #[test]
    fn empty_data_still_records_the_raw_event() {
        let (dispatcher, _events, monitor) = collecting_dispatcher(&["type"]);
        let summary = dispatcher.dispatch(&SubscriptionType::new("Alert"), &json!({"data": []}));
        assert_eq!(summary.published, 0);
        let recorded = monitor.events.lock().expect("monitor lock");
        assert_eq!(recorded.len(), 1);
    }
}
