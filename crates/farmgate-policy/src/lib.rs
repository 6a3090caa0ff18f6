// farmgate-policy/src/lib.rs
// ============================================================================
// Module: Farmgate Policy Library
// Description: Policy decision point backends and the request-time selector.
// Purpose: Evaluate authorization contexts through basic or XACML policies.
// Dependencies: farmgate-core, farmgate-config, reqwest
// ============================================================================

//! ## Overview
//! Two interchangeable [`farmgate_core::PolicyDecisionPoint`] backends: a
//! role-table check evaluated in process, and a remote XACML engine reached
//! over HTTP with bounded timeouts. The selector holds both and routes each
//! request to the backend the static configuration names.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod role;
pub mod selector;
pub mod xacml;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use role::PermissionRule;
pub use role::RolePdp;
pub use selector::PdpSelector;
pub use selector::PolicyInitError;
pub use xacml::XacmlPdp;

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
