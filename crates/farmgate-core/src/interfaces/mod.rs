// farmgate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Farmgate Interfaces
// Description: Backend-agnostic interfaces for policy, publish, and relay.
// Purpose: Define the contract surfaces used by the Farmgate runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Farmgate integrates with external systems without
//! embedding backend-specific details. Policy decisions fail closed: an
//! engine failure is surfaced as an error, never mapped onto a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::AuthorizationContext;
use crate::core::BroadcastEvent;
use crate::core::Decision;
use crate::core::DeviceId;

// ============================================================================
// SECTION: Policy Decision Point
// ============================================================================

/// Decision point flavor, used for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdpKind {
    /// Role/identity-based decision point.
    Basic,
    /// Attribute/time-based decision point backed by a remote engine.
    Xacml,
}

impl PdpKind {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Xacml => "xacml",
        }
    }
}

/// Policy decision errors.
///
/// An unavailable engine is distinct from a deny: callers must surface it as
/// a server-side failure and must not fall back to another decision point.
#[derive(Debug, Error)]
pub enum PdpError {
    /// The policy engine could not be reached or did not answer in time.
    #[error("policy engine unavailable: {0}")]
    EngineUnavailable(String),
}

/// Policy decision point evaluating authorization requests.
pub trait PolicyDecisionPoint: Send + Sync {
    /// Returns the decision point flavor.
    fn kind(&self) -> PdpKind;

    /// Evaluates the authorization context into a decision.
    ///
    /// # Errors
    ///
    /// Returns [`PdpError`] when the decision cannot be computed; failure is
    /// never mapped onto [`Decision::Deny`].
    fn decide(&self, ctx: &AuthorizationContext) -> Result<Decision, PdpError>;
}

// ============================================================================
// SECTION: Publisher
// ============================================================================

/// Publish errors for broadcast delivery.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The channel rejected the event.
    #[error("broadcast delivery failed: {0}")]
    Delivery(String),
}

/// Real-time broadcast channel consumed by the dispatcher.
///
/// Publishing is fire-and-forget from the dispatcher's perspective: a failed
/// publish is recorded and swallowed without affecting later items.
pub trait Publisher: Send + Sync {
    /// Publishes one event to connected listeners.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the event cannot be handed to the
    /// channel.
    fn publish(&self, event: &BroadcastEvent) -> Result<(), PublishError>;
}

// ============================================================================
// SECTION: Event Monitor
// ============================================================================

/// Structured events recorded for observability.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// Raw notification received on the webhook, recorded unconditionally.
    NotificationReceived {
        /// Subscription type from the webhook path.
        subscription_type: String,
        /// Full payload as delivered by the broker.
        payload: Value,
    },
    /// A broadcast publish failed and was swallowed.
    BroadcastFailed {
        /// Target channel.
        channel: String,
        /// Message that failed to deliver.
        message: String,
        /// Failure description.
        reason: String,
    },
    /// A guarded request was allowed.
    AccessAllowed {
        /// Protection tier label.
        tier: &'static str,
        /// Decision point label, absent for authentication-only routes.
        pdp: Option<&'static str>,
        /// Requested action.
        action: String,
        /// Target resource.
        resource: String,
        /// Caller subject when resolved.
        subject: Option<String>,
    },
    /// A guarded request was halted before its handler.
    AccessDenied {
        /// Protection tier label.
        tier: &'static str,
        /// Denial reason label: `authentication_missing` or
        /// `authorization_denied`.
        reason: &'static str,
        /// Requested action.
        action: String,
        /// Target resource.
        resource: String,
        /// Caller subject when resolved.
        subject: Option<String>,
    },
    /// The selected decision point failed; the request was halted with a
    /// server error. Distinct from a deny by taxonomy and by label.
    PolicyEngineUnavailable {
        /// Protection tier label.
        tier: &'static str,
        /// Decision point label.
        pdp: &'static str,
        /// Requested action.
        action: String,
        /// Target resource.
        resource: String,
        /// Failure description.
        reason: String,
    },
}

/// Observability sink for monitor events.
pub trait EventMonitor: Send + Sync {
    /// Records one monitor event.
    fn record(&self, event: &MonitorEvent);
}

// ============================================================================
// SECTION: Command Relay
// ============================================================================

/// Command forwarded to a device through the IoT agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCommand {
    /// Target device.
    pub device_id: DeviceId,
    /// Command name understood by the device.
    pub command: String,
}

/// Relay errors for device commands.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The IoT agent rejected or failed to accept the command.
    #[error("command relay failed: {0}")]
    Relay(String),
}

/// Downstream relay that hands commands to the IoT agent.
pub trait CommandRelay: Send + Sync {
    /// Sends one command to the target device.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] when the command cannot be handed off.
    fn send(&self, command: &DeviceCommand) -> Result<(), RelayError>;
}
