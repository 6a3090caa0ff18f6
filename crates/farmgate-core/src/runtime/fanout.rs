// farmgate-core/src/runtime/fanout.rs
// ============================================================================
// Module: Farmgate Notification Fan-Out
// Description: Best-effort broadcast fan-out for notification payloads.
// Purpose: Emit one broadcast event per matching allow-listed attribute.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! One notification becomes zero or more broadcast events: for every item in
//! the payload, each allow-listed attribute that is present with a truthy
//! value emits one event whose channel is the attribute's rendered value.
//! Delivery is best-effort; a failed publish is recorded and never aborts
//! the remaining items.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::BroadcastEvent;
use crate::core::NotificationPayload;
use crate::core::SubscriptionType;
use crate::interfaces::EventMonitor;
use crate::interfaces::MonitorEvent;
use crate::interfaces::Publisher;

// ============================================================================
// SECTION: Dispatch Summary
// ============================================================================

/// Counters describing one fan-out pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Items inspected.
    pub items: usize,
    /// Events handed to the publisher.
    pub published: usize,
    /// Events the publisher rejected (swallowed).
    pub failed: usize,
}

// ============================================================================
// SECTION: Fan-Out
// ============================================================================

/// Fans one notification payload out to the broadcast channel.
///
/// Item order follows the payload sequence, but delivery order to listeners
/// is not guaranteed across concurrent invocations. An item may emit zero,
/// one, or several events, one per matching allow-listed attribute. The
/// attribute allow-list comes from configuration, never from the payload.
pub fn fan_out(
    subscription_type: &SubscriptionType,
    payload: &NotificationPayload,
    attributes: &[String],
    publisher: &dyn Publisher,
    monitor: &dyn EventMonitor,
) -> DispatchSummary {
    let message = format!("{subscription_type} received");
    let mut summary = DispatchSummary::default();
    for item in &payload.data {
        summary.items += 1;
        for attribute in attributes {
            let Some(value) = item.get(attribute) else {
                continue;
            };
            if !value.is_truthy() {
                continue;
            }
            let Some(channel) = value.channel_label() else {
                continue;
            };
            let event = BroadcastEvent {
                channel,
                message: message.clone(),
            };
            match publisher.publish(&event) {
                Ok(()) => summary.published += 1,
                Err(err) => {
                    summary.failed += 1;
                    monitor.record(&MonitorEvent::BroadcastFailed {
                        channel: event.channel,
                        message: event.message,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }
    summary
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

    use std::sync::Mutex;

    use super::fan_out;
    use crate::core::BroadcastEvent;
    use crate::core::NotificationPayload;
    use crate::core::SubscriptionType;
    use crate::interfaces::EventMonitor;
    use crate::interfaces::MonitorEvent;
    use crate::interfaces::PublishError;
    use crate::interfaces::Publisher;

    /// Publisher fixture collecting events, optionally failing on a channel.
    #[derive(Default)]
    struct RecordingPublisher {
        /// Events accepted so far.
        events: Mutex<Vec<BroadcastEvent>>,
        /// Channel that always fails to deliver.
        poison_channel: Option<String>,
    }

    impl Publisher for RecordingPublisher {
        fn publish(&self, event: &BroadcastEvent) -> Result<(), PublishError> {
            if self.poison_channel.as_deref() == Some(event.channel.as_str()) {
                return Err(PublishError::Delivery("poisoned".to_string()));
            }
            self.events.lock().expect("events lock").push(event.clone());
            Ok(())
        }
    }

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

    fn payload(raw: &str) -> NotificationPayload {
        serde_json::from_str(raw).expect("payload")
    }

    fn allow_list(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn matching_attributes_each_emit_one_event() {
        let publisher = RecordingPublisher::default();
        let monitor = RecordingMonitor::default();
        let summary = fan_out(
            &SubscriptionType::new("Alert"),
            &payload(r#"{"data":[{"type":"Sensor","filling":80}]}"#),
            &allow_list(&["type", "filling"]),
            &publisher,
            &monitor,
        );
        assert_eq!(summary.published, 2);
        assert_eq!(summary.failed, 0);
        let events = publisher.events.lock().expect("events lock");
        let channels: Vec<&str> = events.iter().map(|event| event.channel.as_str()).collect();
        assert_eq!(channels, vec!["Sensor", "80"]);
        assert!(events.iter().all(|event| event.message == "Alert received"));
    }

    #[test]
    fn falsy_values_are_suppressed() {
        let publisher = RecordingPublisher::default();
        let monitor = RecordingMonitor::default();
        let summary = fan_out(
            &SubscriptionType::new("Alert"),
            &payload(r#"{"data":[{"humidity":0}]}"#),
            &allow_list(&["humidity"]),
            &publisher,
            &monitor,
        );
        assert_eq!(summary.items, 1);
        assert_eq!(summary.published, 0);
        assert!(publisher.events.lock().expect("events lock").is_empty());
    }

    #[test]
    fn attributes_outside_the_allow_list_are_ignored() {
        let publisher = RecordingPublisher::default();
        let monitor = RecordingMonitor::default();
        let summary = fan_out(
            &SubscriptionType::new("Alert"),
            &payload(r#"{"data":[{"temperature":21,"battery":94}]}"#),
            &allow_list(&["temperature"]),
            &publisher,
            &monitor,
        );
        assert_eq!(summary.published, 1);
        let events = publisher.events.lock().expect("events lock");
        assert_eq!(events[0].channel, "21");
    }

    #[test]
    fn empty_data_emits_nothing() {
        let publisher = RecordingPublisher::default();
        let monitor = RecordingMonitor::default();
        let summary = fan_out(
            &SubscriptionType::new("Alert"),
            &payload(r#"{"data":[]}"#),
            &allow_list(&["type"]),
            &publisher,
            &monitor,
        );
        assert_eq!(summary, super::DispatchSummary::default());
    }

    #[test]
    fn publish_failure_does_not_abort_later_items() {
        let publisher = RecordingPublisher {
            events: Mutex::new(Vec::new()),
            poison_channel: Some("Sensor".to_string()),
        };
        let monitor = RecordingMonitor::default();
        let summary = fan_out(
            &SubscriptionType::new("Alert"),
            &payload(r#"{"data":[{"type":"Sensor"},{"filling":60}]}"#),
            &allow_list(&["type", "filling"]),
            &publisher,
            &monitor,
        );
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.published, 1);
        let events = publisher.events.lock().expect("events lock");
        assert_eq!(events[0].channel, "60");
        let recorded = monitor.events.lock().expect("monitor lock");
        assert!(matches!(
            recorded.as_slice(),
            [MonitorEvent::BroadcastFailed {
                channel,
                ..
            }] if channel == "Sensor"
        ));
    }
}
