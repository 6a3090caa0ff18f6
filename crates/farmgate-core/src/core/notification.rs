// farmgate-core/src/core/notification.rs
// ============================================================================
// Module: Farmgate Notification Model
// Description: Context-broker notification payloads and broadcast events.
// Purpose: Model loosely-typed notification items with defined truthiness.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The context broker delivers notifications whose items are open mappings
//! from attribute name to value; the schema is not fixed by this layer. The
//! fan-out filter keys on attribute values, so "truthy" is a defined
//! predicate here rather than any language default: null, `false`, `0`, and
//! the empty string all suppress emission.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;

// ============================================================================
// SECTION: Attribute Values
// ============================================================================

/// Dynamically-typed attribute value carried by a notification item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Nested sequence.
    Array(Vec<AttrValue>),
    /// Nested mapping.
    Object(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Returns true when the value passes the fan-out filter.
    ///
    /// # Invariants
    /// - `Null`, `false`, numeric zero, and the empty string are falsy.
    /// - Every other value, including empty arrays and objects, is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Number(value) => value.as_f64().is_some_and(|float| float != 0.0),
            Self::String(value) => !value.is_empty(),
            Self::Array(_) | Self::Object(_) => true,
        }
    }

    /// Renders the value as a broadcast channel name.
    ///
    /// Strings pass through unchanged, numbers and booleans use their
    /// canonical display form, and nested values render as compact JSON.
    /// Returns `None` only when a nested value cannot be serialized.
    #[must_use]
    pub fn channel_label(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Number(value) => Some(value.to_string()),
            Self::String(value) => Some(value.clone()),
            Self::Array(_) | Self::Object(_) => serde_json::to_string(self).ok(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.channel_label() {
            Some(label) => f.write_str(&label),
            None => f.write_str("null"),
        }
    }
}

// ============================================================================
// SECTION: Notification Payload
// ============================================================================

/// Single notification item: an open attribute mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(BTreeMap<String, AttrValue>);

impl Item {
    /// Creates an item from an attribute mapping.
    #[must_use]
    pub const fn new(attributes: BTreeMap<String, AttrValue>) -> Self {
        Self(attributes)
    }

    /// Returns the value of the named attribute, if present.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&AttrValue> {
        self.0.get(attribute)
    }

    /// Returns true when the item has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AttrValue)> for Item {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Notification payload delivered by the context broker.
///
/// Unknown top-level fields are ignored: the broker attaches subscription
/// metadata this layer never interprets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Ordered sequence of changed entities.
    #[serde(default)]
    pub data: Vec<Item>,
}

impl NotificationPayload {
    /// Creates a payload from a sequence of items.
    #[must_use]
    pub const fn new(data: Vec<Item>) -> Self {
        Self {
            data,
        }
    }
}

// ============================================================================
// SECTION: Broadcast Events
// ============================================================================

/// Real-time message pushed to connected listeners.
///
/// # Invariants
/// - Ephemeral: constructed, published, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    /// Listener channel derived from one attribute value.
    pub channel: String,
    /// Human-readable message naming the subscription type.
    pub message: String,
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

    use super::AttrValue;
    use super::NotificationPayload;

    fn value(raw: &str) -> AttrValue {
        serde_json::from_str(raw).expect("attribute value")
    }

    #[test]
    fn truthiness_suppresses_falsy_values() {
        assert!(!value("null").is_truthy());
        assert!(!value("false").is_truthy());
        assert!(!value("0").is_truthy());
        assert!(!value("0.0").is_truthy());
        assert!(!value("\"\"").is_truthy());
    }

    #[test]
    fn truthiness_passes_non_falsy_values() {
        assert!(value("true").is_truthy());
        assert!(value("80").is_truthy());
        assert!(value("-1").is_truthy());
        assert!(value("\"Sensor\"").is_truthy());
        assert!(value("[]").is_truthy());
        assert!(value("{}").is_truthy());
    }

    #[test]
    fn channel_label_renders_scalars_canonically() {
        assert_eq!(value("80").channel_label().as_deref(), Some("80"));
        assert_eq!(value("3.5").channel_label().as_deref(), Some("3.5"));
        assert_eq!(value("true").channel_label().as_deref(), Some("true"));
        let urn = value("\"urn:ngsi-ld:Device:001\"");
        assert_eq!(urn.channel_label().as_deref(), Some("urn:ngsi-ld:Device:001"));
    }

    #[test]
    fn payload_tolerates_missing_data_and_unknown_fields() {
        let payload: NotificationPayload =
            serde_json::from_str(r#"{"subscriptionId":"sub1"}"#).expect("payload");
        assert!(payload.data.is_empty());
    }
}
