// farmgate-server/src/enforce.rs
// ============================================================================
// Module: Farmgate Tier Enforcement
// Description: Guard middleware composed ahead of protected handlers.
// Purpose: Halt unauthorized requests before any handler side effect.
// Dependencies: farmgate-core, axum
// ============================================================================

//! ## Overview
//! Each protected route declares a [`GuardSpec`] naming its tier, action,
//! and resource. The guard resolves the caller's identity, evaluates the
//! tier against the selected decision point, and either passes control to
//! the handler or answers with the failure's status: 401 for a missing
//! identity, 403 for a deny, 502 for an unavailable engine. Denied and
//! unavailable are distinct outcomes end to end, in both status and audit
//! label.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use farmgate_core::AccessError;
use farmgate_core::ActionId;
use farmgate_core::AuthorizationContext;
use farmgate_core::Identity;
use farmgate_core::MonitorEvent;
use farmgate_core::PolicyDecisionPoint;
use farmgate_core::ProtectionTier;
use farmgate_core::ResourceId;
use farmgate_core::enforce;
use serde::Serialize;

use crate::state::ServerState;

// ============================================================================
// SECTION: Guard Spec
// ============================================================================

/// Per-route guard declaration.
#[derive(Clone)]
pub struct GuardSpec {
    /// Protection tier enforced for the route.
    pub tier: ProtectionTier,
    /// Action the route performs.
    pub action: ActionId,
    /// Resource the route targets; `None` uses the request path.
    pub resource: Option<ResourceId>,
}

// ============================================================================
// SECTION: Error Body
// ============================================================================

/// JSON error envelope for halted requests.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Stable failure label.
    pub error: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Maps an access failure onto its response.
#[must_use]
pub fn error_response(error: &AccessError) -> (StatusCode, axum::Json<ApiError>) {
    let status = match error {
        AccessError::AuthenticationMissing => StatusCode::UNAUTHORIZED,
        AccessError::AuthorizationDenied => StatusCode::FORBIDDEN,
        AccessError::PolicyEngineUnavailable(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        axum::Json(ApiError {
            error: error.label(),
            message: error.to_string(),
        }),
    )
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates one guarded request.
///
/// Returns the resolved identity on success so the handler can use it.
///
/// # Errors
///
/// Returns [`AccessError`] when the request must halt before its handler.
pub fn evaluate(
    state: &ServerState,
    spec: &GuardSpec,
    auth_header: Option<&str>,
    request_path: &str,
) -> Result<Identity, AccessError> {
    let resolved = state.resolver.resolve(auth_header);
    let subject = resolved.as_ref().map(|identity| identity.username.clone());
    let resource =
        spec.resource.clone().unwrap_or_else(|| ResourceId::new(request_path));
    let ctx = AuthorizationContext {
        identity: resolved.clone(),
        action: spec.action.clone(),
        resource: resource.clone(),
        time_of_day: state.now(),
    };
    let pdp = match spec.tier {
        ProtectionTier::Authenticate | ProtectionTier::BasicAuthorize => state.selector.basic(),
        ProtectionTier::AdvancedAuthorize => state.selector.select(),
    };
    let outcome = enforce_with_blocking(spec.tier, &ctx, pdp);
    match &outcome {
        Ok(()) => {
            let pdp_label = match spec.tier {
                ProtectionTier::Authenticate => None,
                ProtectionTier::BasicAuthorize | ProtectionTier::AdvancedAuthorize => {
                    Some(pdp.kind().label())
                }
            };
            state.monitor.record(&MonitorEvent::AccessAllowed {
                tier: spec.tier.label(),
                pdp: pdp_label,
                action: spec.action.to_string(),
                resource: resource.to_string(),
                subject: subject.clone(),
            });
        }
        Err(error @ (AccessError::AuthenticationMissing | AccessError::AuthorizationDenied)) => {
            state.monitor.record(&MonitorEvent::AccessDenied {
                tier: spec.tier.label(),
                reason: error.label(),
                action: spec.action.to_string(),
                resource: resource.to_string(),
                subject: subject.clone(),
            });
        }
        Err(AccessError::PolicyEngineUnavailable(reason)) => {
            state.monitor.record(&MonitorEvent::PolicyEngineUnavailable {
                tier: spec.tier.label(),
                pdp: pdp.kind().label(),
                action: spec.action.to_string(),
                resource: resource.to_string(),
                reason: reason.clone(),
            });
        }
    }
    outcome?;
    // A passing guard implies a resolved identity on every tier.
    resolved.ok_or(AccessError::AuthenticationMissing)
}

/// Runs the guard, shifting to a blocking context when available.
///
/// Tier 3 evaluation may block on network I/O to the policy engine.
fn enforce_with_blocking(
    tier: ProtectionTier,
    ctx: &AuthorizationContext,
    pdp: &dyn PolicyDecisionPoint,
) -> Result<(), AccessError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| enforce(tier, ctx, pdp))
        }
        _ => enforce(tier, ctx, pdp),
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Guard middleware composed ahead of a protected handler.
///
/// On failure the handler never runs; the response carries the failure's
/// status and JSON envelope.
pub async fn guard(
    State((state, spec)): State<(Arc<ServerState>, GuardSpec)>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let path = request.uri().path().to_string();
    match evaluate(&state, &spec, auth_header.as_deref(), &path) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(error) => error_response(&error).into_response(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
