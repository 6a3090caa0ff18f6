// farmgate-core/src/runtime/guard.rs
// ============================================================================
// Module: Farmgate Tier Guard
// Description: Escalating access enforcement ahead of protected handlers.
// Purpose: Halt requests that fail authentication or policy evaluation.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The guard composes ahead of a protected handler. On a deny the pipeline
//! stops and the handler never executes, so no partial side effects of the
//! protected action can occur. An engine failure is a distinct outcome from
//! a deny: it halts the request as a server-side failure and never falls
//! back to another decision point.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::AuthorizationContext;
use crate::core::Decision;
use crate::core::ProtectionTier;
use crate::interfaces::PdpError;
use crate::interfaces::PolicyDecisionPoint;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Access failures raised by the guard.
///
/// Each variant maps to a distinct response class and audit label; denied and
/// unavailable must never be conflated.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No resolved identity on a guarded route.
    #[error("authentication required")]
    AuthenticationMissing,
    /// The decision point returned a deny.
    #[error("access denied")]
    AuthorizationDenied,
    /// The decision point failed to produce a decision.
    #[error("policy engine unavailable: {0}")]
    PolicyEngineUnavailable(String),
}

impl AccessError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AuthenticationMissing => "authentication_missing",
            Self::AuthorizationDenied => "authorization_denied",
            Self::PolicyEngineUnavailable(_) => "policy_engine_unavailable",
        }
    }
}

// ============================================================================
// SECTION: Guard
// ============================================================================

/// Evaluates the context against the selected decision point.
///
/// Decisions are recomputed on every call; nothing is memoized across
/// requests or users.
///
/// # Errors
///
/// Returns [`PdpError`] when the decision point fails. Failure is never
/// treated as a deny.
pub fn authorize(
    ctx: &AuthorizationContext,
    pdp: &dyn PolicyDecisionPoint,
) -> Result<Decision, PdpError> {
    pdp.decide(ctx)
}

/// Enforces a protection tier ahead of a protected handler.
///
/// The caller selects the decision point for the route's tier; tier 3 routes
/// pass the advanced point when one is configured and the basic point
/// otherwise, which realizes the designed degrade path. Tier 1 never
/// evaluates policy.
///
/// # Errors
///
/// Returns [`AccessError`] when the request must halt: missing identity,
/// an explicit deny, or a decision point failure.
pub fn enforce(
    tier: ProtectionTier,
    ctx: &AuthorizationContext,
    pdp: &dyn PolicyDecisionPoint,
) -> Result<(), AccessError> {
    if ctx.identity.is_none() {
        return Err(AccessError::AuthenticationMissing);
    }
    if tier == ProtectionTier::Authenticate {
        return Ok(());
    }
    match authorize(ctx, pdp) {
        Ok(Decision::Allow) => Ok(()),
        Ok(Decision::Deny) => Err(AccessError::AuthorizationDenied),
        Err(PdpError::EngineUnavailable(reason)) => {
            Err(AccessError::PolicyEngineUnavailable(reason))
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
