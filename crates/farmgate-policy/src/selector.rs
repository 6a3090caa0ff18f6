// farmgate-policy/src/selector.rs
// ============================================================================
// Module: Farmgate PDP Selector
// Description: Request-time routing between policy decision point backends.
// Purpose: Choose the decision point named by static configuration.
// Dependencies: farmgate-core, farmgate-config
// ============================================================================

//! ## Overview
//! The selector holds both constructed decision points and routes each
//! protected request to one of them. Selection is a pure function of the
//! startup flag and is re-evaluated on every call; configuration is
//! immutable for the process lifetime, so the result never changes, but the
//! contract stays ready for hot reload. When the advanced engine is not
//! configured, tier 3 routes degrade transparently to the basic decision
//! point — a designed fallback, not an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use farmgate_config::PolicyConfig;
use farmgate_core::PolicyDecisionPoint;
use thiserror::Error;

use crate::role::RolePdp;
use crate::xacml::XacmlPdp;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing decision points.
#[derive(Debug, Error)]
pub enum PolicyInitError {
    /// The engine endpoint did not parse.
    #[error("invalid policy engine endpoint: {0}")]
    Endpoint(String),
    /// The HTTP client could not be constructed.
    #[error("policy engine client init failed: {0}")]
    Client(String),
    /// The advanced flag is set but no engine is configured.
    #[error("advanced policy enabled without an engine configuration")]
    MissingEngine,
}

// ============================================================================
// SECTION: Selector
// ============================================================================

/// Request-time selector over the configured decision points.
///
/// # Invariants
/// - Exactly one decision point is active for the process lifetime.
/// - `select` has no side effects and is safe to call per request.
pub struct PdpSelector {
    /// True when tier 3 routes consult the advanced engine.
    advanced_enabled: bool,
    /// Basic decision point, always available.
    basic: Arc<dyn PolicyDecisionPoint>,
    /// Advanced decision point when one is configured.
    advanced: Option<Arc<dyn PolicyDecisionPoint>>,
}

impl PdpSelector {
    /// Creates a selector over explicit decision points.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyInitError::MissingEngine`] when the advanced flag is
    /// set without an advanced decision point.
    pub fn new(
        advanced_enabled: bool,
        basic: Arc<dyn PolicyDecisionPoint>,
        advanced: Option<Arc<dyn PolicyDecisionPoint>>,
    ) -> Result<Self, PolicyInitError> {
        if advanced_enabled && advanced.is_none() {
            return Err(PolicyInitError::MissingEngine);
        }
        Ok(Self {
            advanced_enabled,
            basic,
            advanced,
        })
    }

    /// Builds the selector and both decision points from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyInitError`] when a decision point cannot be built.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, PolicyInitError> {
        let basic: Arc<dyn PolicyDecisionPoint> = Arc::new(RolePdp::from_config(&config.basic));
        let advanced: Option<Arc<dyn PolicyDecisionPoint>> = match &config.xacml {
            Some(xacml) if config.advanced_enabled => {
                Some(Arc::new(XacmlPdp::from_config(xacml)?))
            }
            _ => None,
        };
        Self::new(config.advanced_enabled, basic, advanced)
    }

    /// Returns the decision point for tier 3 routes.
    ///
    /// Evaluated per request: the advanced engine when configured, the basic
    /// decision point otherwise.
    #[must_use]
    pub fn select(&self) -> &dyn PolicyDecisionPoint {
        if self.advanced_enabled {
            if let Some(advanced) = &self.advanced {
                return advanced.as_ref();
            }
        }
        self.basic.as_ref()
    }

    /// Returns the basic decision point for tier 2 routes.
    #[must_use]
    pub fn basic(&self) -> &dyn PolicyDecisionPoint {
        self.basic.as_ref()
    }

    /// Returns true when tier 3 routes enforce advanced strength.
    #[must_use]
    pub const fn advanced_active(&self) -> bool {
        self.advanced_enabled && self.advanced.is_some()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
