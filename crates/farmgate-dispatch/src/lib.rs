// farmgate-dispatch/src/lib.rs
// ============================================================================
// Module: Farmgate Dispatch Library
// Description: Subscription dispatcher and broadcast channel backends.
// Purpose: Fan notification payloads out to real-time listeners.
// Dependencies: farmgate-core, tokio
// ============================================================================

//! ## Overview
//! Farmgate Dispatch provides ready-made publisher and monitor
//! implementations plus the subscription dispatcher that wires them around
//! the core fan-out algorithm.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dispatcher;
pub mod monitor;
pub mod publisher;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatcher::DispatcherBuildError;
pub use dispatcher::SubscriptionDispatcher;
pub use dispatcher::SubscriptionDispatcherBuilder;
pub use monitor::NoopMonitor;
pub use monitor::StderrMonitor;
pub use monitor::WriterMonitor;
pub use publisher::BroadcastPublisher;
pub use publisher::CallbackPublisher;
pub use publisher::LogPublisher;

#[cfg(test)]
mod tests {
    //! Test-only lint relaxations for panic-based assertions and debug output.
    #![allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        clippy::dbg_macro,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only output and panic-based assertions are permitted."
    )]
}
