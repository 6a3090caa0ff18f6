// farmgate-server/src/lib.rs
// ============================================================================
// Module: Farmgate Server
// Description: HTTP surface for the farm-monitoring portal core.
// Purpose: Guard restricted actions and dispatch broker notifications.
// Dependencies: farmgate-core, farmgate-policy, farmgate-dispatch, axum
// ============================================================================

//! ## Overview
//! The server composes the tier guard ahead of protected routes and exposes
//! the subscription webhook. All authorization failures are handled at the
//! guard boundary and never reach a protected handler. Security posture:
//! inbound requests are untrusted; the context broker behind the webhook is
//! trusted infrastructure.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod enforce;
pub mod identity;
pub mod relay;
pub mod routes;
pub mod server;
pub mod state;

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

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use enforce::GuardSpec;
pub use identity::IdentityResolver;
pub use identity::StaticResolver;
pub use identity::TokenTableResolver;
pub use relay::AckRelay;
pub use server::FarmgateServer;
pub use server::ServerError;
pub use state::ServerState;
