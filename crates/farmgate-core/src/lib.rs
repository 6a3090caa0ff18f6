// farmgate-core/src/lib.rs
// ============================================================================
// Module: Farmgate Core Library
// Description: Public API surface for the Farmgate core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Farmgate core provides the access-control and notification fan-out model
//! for the farm-monitoring portal. It is backend-agnostic and integrates with
//! policy engines, real-time channels, and device agents through explicit
//! interfaces rather than embedding into any HTTP framework.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CommandRelay;
pub use interfaces::DeviceCommand;
pub use interfaces::EventMonitor;
pub use interfaces::MonitorEvent;
pub use interfaces::PdpError;
pub use interfaces::PdpKind;
pub use interfaces::PolicyDecisionPoint;
pub use interfaces::PublishError;
pub use interfaces::Publisher;
pub use interfaces::RelayError;
pub use runtime::AccessError;
pub use runtime::DispatchSummary;
pub use runtime::authorize;
pub use runtime::enforce;
pub use runtime::fan_out;
