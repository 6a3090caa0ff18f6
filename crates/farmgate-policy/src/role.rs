// farmgate-policy/src/role.rs
// ============================================================================
// Module: Farmgate Role Decision Point
// Description: Role-table policy decision point for basic authorization.
// Purpose: Decide restricted actions from a configured permission table.
// Dependencies: farmgate-core, farmgate-config
// ============================================================================

//! ## Overview
//! The basic decision point matches the request's action and resource
//! against a configured permission table and allows the request when the
//! caller holds one of the listed roles. Actions with no matching entry
//! resolve to the configured default decision, which ships as deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use farmgate_config::BasicPolicyConfig;
use farmgate_core::ActionId;
use farmgate_core::AuthorizationContext;
use farmgate_core::Decision;
use farmgate_core::PdpError;
use farmgate_core::PdpKind;
use farmgate_core::PolicyDecisionPoint;
use farmgate_core::ResourceId;
use farmgate_core::RoleName;

// ============================================================================
// SECTION: Permission Rules
// ============================================================================

/// One permission rule: roles allowed to perform an action on a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRule {
    /// Action the rule covers.
    pub action: ActionId,
    /// Resource the rule covers; `None` covers any resource.
    pub resource: Option<ResourceId>,
    /// Roles allowed by the rule.
    pub roles: BTreeSet<RoleName>,
}

impl PermissionRule {
    /// Returns true when the rule covers the request's action and resource.
    fn matches(&self, ctx: &AuthorizationContext) -> bool {
        if self.action != ctx.action {
            return false;
        }
        self.resource.as_ref().is_none_or(|resource| *resource == ctx.resource)
    }
}

// ============================================================================
// SECTION: Role Decision Point
// ============================================================================

/// Role-table policy decision point.
///
/// # Invariants
/// - Evaluation is pure: same context, same table, same decision.
/// - A caller without identity is denied, never an error.
pub struct RolePdp {
    /// Decision for actions with no matching rule.
    default_decision: Decision,
    /// Permission table.
    rules: Vec<PermissionRule>,
}

impl RolePdp {
    /// Creates a decision point from a rule table.
    #[must_use]
    pub const fn new(default_decision: Decision, rules: Vec<PermissionRule>) -> Self {
        Self {
            default_decision,
            rules,
        }
    }

    /// Builds a decision point from the basic policy configuration.
    #[must_use]
    pub fn from_config(config: &BasicPolicyConfig) -> Self {
        let rules = config
            .permissions
            .iter()
            .map(|entry| PermissionRule {
                action: ActionId::new(entry.action.as_str()),
                resource: entry.resource.as_deref().map(ResourceId::new),
                roles: entry.roles.iter().map(|role| RoleName::new(role.as_str())).collect(),
            })
            .collect();
        Self::new(config.default_decision, rules)
    }
}

impl PolicyDecisionPoint for RolePdp {
    fn kind(&self) -> PdpKind {
        PdpKind::Basic
    }

    fn decide(&self, ctx: &AuthorizationContext) -> Result<Decision, PdpError> {
        let Some(identity) = &ctx.identity else {
            return Ok(Decision::Deny);
        };
        let mut matched = false;
        for rule in &self.rules {
            if !rule.matches(ctx) {
                continue;
            }
            matched = true;
            if rule.roles.iter().any(|role| identity.has_role(role)) {
                return Ok(Decision::Allow);
            }
        }
        if matched {
            Ok(Decision::Deny)
        } else {
            Ok(self.default_decision)
        }
    }
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

    use std::collections::BTreeSet;

    use farmgate_core::ActionId;
    use farmgate_core::AuthorizationContext;
    use farmgate_core::Decision;
    use farmgate_core::Identity;
    use farmgate_core::PolicyDecisionPoint;
    use farmgate_core::ResourceId;
    use farmgate_core::RoleName;
    use farmgate_core::Timestamp;
    use farmgate_core::UserId;

    use super::PermissionRule;
    use super::RolePdp;

    fn identity(roles: &[&str]) -> Identity {
        Identity {
            user_id: UserId::new("alice"),
            username: "alice".to_string(),
            roles: roles.iter().map(|role| RoleName::new(*role)).collect(),
        }
    }

    fn ctx(identity: Option<Identity>, action: &str, resource: &str) -> AuthorizationContext {
        AuthorizationContext {
            identity,
            action: ActionId::new(action),
            resource: ResourceId::new(resource),
            time_of_day: Timestamp::from_unix_millis(0),
        }
    }

    fn rule(action: &str, resource: Option<&str>, roles: &[&str]) -> PermissionRule {
        PermissionRule {
            action: ActionId::new(action),
            resource: resource.map(ResourceId::new),
            roles: roles.iter().map(|role| RoleName::new(*role)).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn matching_role_allows() {
        let pdp = RolePdp::new(Decision::Deny, vec![rule("price-change", None, &["manager"])]);
        let decision = pdp
            .decide(&ctx(Some(identity(&["manager"])), "price-change", "farm001"))
            .expect("decision");
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn missing_role_denies() {
        let pdp = RolePdp::new(Decision::Deny, vec![rule("price-change", None, &["manager"])]);
        let decision = pdp
            .decide(&ctx(Some(identity(&["clerk"])), "price-change", "farm001"))
            .expect("decision");
        assert_eq!(decision, Decision::Deny);
    }

    #[test]
    fn unlisted_action_uses_default_decision() {
        let pdp = RolePdp::new(Decision::Deny, vec![rule("price-change", None, &["manager"])]);
        let decision = pdp
            .decide(&ctx(Some(identity(&["manager"])), "order-stock", "farm001"))
            .expect("decision");
        assert_eq!(decision, Decision::Deny);

        let permissive = RolePdp::new(Decision::Allow, Vec::new());
        let decision = permissive
            .decide(&ctx(Some(identity(&[])), "order-stock", "farm001"))
            .expect("decision");
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn resource_scoped_rules_only_cover_their_resource() {
        let pdp = RolePdp::new(
            Decision::Deny,
            vec![rule("unlock", Some("door001"), &["manager"])],
        );
        let allowed = pdp
            .decide(&ctx(Some(identity(&["manager"])), "unlock", "door001"))
            .expect("decision");
        assert_eq!(allowed, Decision::Allow);
        let denied = pdp
            .decide(&ctx(Some(identity(&["manager"])), "unlock", "door002"))
            .expect("decision");
        assert_eq!(denied, Decision::Deny);
    }

    #[test]
    fn missing_identity_denies_without_error() {
        let pdp = RolePdp::new(Decision::Allow, Vec::new());
        let decision = pdp.decide(&ctx(None, "price-change", "farm001")).expect("decision");
        assert_eq!(decision, Decision::Deny);
    }
}
