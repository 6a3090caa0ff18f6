// farmgate-dispatch/src/publisher/mod.rs
// ============================================================================
// Module: Farmgate Publishers
// Description: Publisher implementations for the broadcast channel.
// Purpose: Deliver broadcast events to listeners, logs, or callbacks.
// Dependencies: farmgate-core, tokio
// ============================================================================

//! ## Overview
//! Publishers implement [`farmgate_core::Publisher`] for the real-time
//! broadcast channel, a JSON-line log, and a user-supplied callback. All of
//! them tolerate concurrent publish; none guarantees delivery order across
//! concurrent webhook calls.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod broadcast;
pub mod callback;
pub mod log;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use broadcast::BroadcastPublisher;
pub use callback::CallbackPublisher;
pub use log::LogPublisher;
