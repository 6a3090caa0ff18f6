// farmgate-core/src/core/authz.rs
// ============================================================================
// Module: Farmgate Authorization Model
// Description: Identity, authorization context, decisions, and tiers.
// Purpose: Define the immutable per-request inputs to policy evaluation.
// Dependencies: serde, crate::core::{identifiers, time}
// ============================================================================

//! ## Overview
//! An [`AuthorizationContext`] is produced once by the HTTP layer per
//! protected request and consumed by exactly one policy decision point.
//! Decisions are never cached: policies may depend on time of day or state
//! held by an external engine, so every request is evaluated fresh.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ActionId;
use crate::core::identifiers::ResourceId;
use crate::core::identifiers::RoleName;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Resolved caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User identifier.
    pub user_id: UserId,
    /// Display username.
    pub username: String,
    /// Roles granted to the user.
    pub roles: Vec<RoleName>,
}

impl Identity {
    /// Returns true when the identity carries the given role.
    #[must_use]
    pub fn has_role(&self, role: &RoleName) -> bool {
        self.roles.contains(role)
    }
}

// ============================================================================
// SECTION: Authorization Context
// ============================================================================

/// Immutable per-request input to policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Resolved identity, absent when the caller is not authenticated.
    pub identity: Option<Identity>,
    /// Requested action.
    pub action: ActionId,
    /// Target resource.
    pub resource: ResourceId,
    /// Request time supplied by the HTTP layer.
    pub time_of_day: Timestamp,
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Outcome of a policy evaluation.
///
/// # Invariants
/// - Never cached; recomputed for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The caller may perform the action.
    Allow,
    /// The caller may not perform the action.
    Deny,
}

impl Decision {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

// ============================================================================
// SECTION: Protection Tiers
// ============================================================================

/// Escalating protection strengths for guarded routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionTier {
    /// Tier 1: require a resolved identity, no policy evaluation.
    Authenticate,
    /// Tier 2: require identity and an Allow from the basic decision point.
    BasicAuthorize,
    /// Tier 3: require identity and an Allow from the advanced decision
    /// point; degrades to tier 2 when no advanced engine is configured.
    AdvancedAuthorize,
}

impl ProtectionTier {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::BasicAuthorize => "basic_authorize",
            Self::AdvancedAuthorize => "advanced_authorize",
        }
    }
}
