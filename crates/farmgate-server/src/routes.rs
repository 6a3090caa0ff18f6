// farmgate-server/src/routes.rs
// ============================================================================
// Module: Farmgate Routes
// Description: Route table and handlers for the portal core.
// Purpose: Compose guards ahead of protected handlers and serve the webhook.
// Dependencies: farmgate-core, axum
// ============================================================================

//! ## Overview
//! The route table mirrors the portal: a version probe, the subscription
//! webhook, and the guarded device/portal actions. Each guarded route
//! declares its tier and action; the guard layer runs ahead of the handler
//! and is the only place authorization failures are answered from.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use farmgate_core::ActionId;
use farmgate_core::DeviceCommand;
use farmgate_core::DeviceId;
use farmgate_core::Identity;
use farmgate_core::ProtectionTier;
use farmgate_core::SubscriptionType;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::enforce::ApiError;
use crate::enforce::GuardSpec;
use crate::enforce::guard;
use crate::state::ServerState;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Action name for device commands.
const ACTION_DEVICE_COMMAND: &str = "device-command";
/// Action name for price changes.
const ACTION_PRICE_CHANGE: &str = "price-change";
/// Action name for stock orders.
const ACTION_ORDER_STOCK: &str = "order-stock";
/// Action name for farm views.
const ACTION_VIEW_FARM: &str = "view-farm";

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the portal router over shared state.
#[must_use]
pub fn build_router(state: Arc<ServerState>) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;
    Router::new()
        .route("/version", get(version))
        .route("/subscription/{type}", post(subscription))
        .route(
            "/device/command",
            post(device_command).layer(middleware::from_fn_with_state(
                (
                    Arc::clone(&state),
                    GuardSpec {
                        tier: ProtectionTier::AdvancedAuthorize,
                        action: ActionId::new(ACTION_DEVICE_COMMAND),
                        resource: None,
                    },
                ),
                guard,
            )),
        )
        .route(
            "/app/price-change",
            post(price_change).layer(middleware::from_fn_with_state(
                (
                    Arc::clone(&state),
                    GuardSpec {
                        tier: ProtectionTier::AdvancedAuthorize,
                        action: ActionId::new(ACTION_PRICE_CHANGE),
                        resource: None,
                    },
                ),
                guard,
            )),
        )
        .route(
            "/app/order-stock",
            post(order_stock).layer(middleware::from_fn_with_state(
                (
                    Arc::clone(&state),
                    GuardSpec {
                        tier: ProtectionTier::AdvancedAuthorize,
                        action: ActionId::new(ACTION_ORDER_STOCK),
                        resource: None,
                    },
                ),
                guard,
            )),
        )
        .route(
            "/app/farm/{id}",
            get(farm).layer(middleware::from_fn_with_state(
                (
                    Arc::clone(&state),
                    GuardSpec {
                        tier: ProtectionTier::Authenticate,
                        action: ActionId::new(ACTION_VIEW_FARM),
                        resource: None,
                    },
                ),
                guard,
            )),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Open Handlers
// ============================================================================

/// Version response payload.
#[derive(Debug, Serialize)]
struct VersionBody {
    /// Build label from configuration.
    #[serde(rename = "gitHash")]
    git_hash: String,
}

/// Reports the build label.
async fn version(State(state): State<Arc<ServerState>>) -> Json<VersionBody> {
    Json(VersionBody {
        git_hash: state.config.server.git_commit.clone(),
    })
}

/// Accepts one context-broker notification.
///
/// The webhook acknowledges with 204 No Content before fan-out completes and
/// independently of any broadcast failure. A body that does not parse
/// dispatches as zero items; the raw event is still recorded.
async fn subscription(
    State(state): State<Arc<ServerState>>,
    Path(subscription_type): Path<String>,
    bytes: Bytes,
) -> StatusCode {
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    let dispatcher = Arc::clone(&state.dispatcher);
    let subscription_type = SubscriptionType::new(subscription_type);
    tokio::spawn(async move {
        let _ = dispatcher.dispatch(&subscription_type, &body);
    });
    StatusCode::NO_CONTENT
}

// ============================================================================
// SECTION: Guarded Handlers
// ============================================================================

/// Device command request payload.
#[derive(Debug, Deserialize)]
struct CommandRequest {
    /// Target device.
    device_id: String,
    /// Command name understood by the device.
    command: String,
}

/// Device command receipt payload.
#[derive(Debug, Serialize)]
struct CommandReceipt {
    /// Acceptance label.
    status: &'static str,
    /// Target device.
    device_id: String,
    /// Relayed command.
    command: String,
}

/// Relays an accepted command to the IoT agent.
async fn device_command(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<CommandRequest>,
) -> Response {
    let command = DeviceCommand {
        device_id: DeviceId::new(request.device_id),
        command: request.command,
    };
    match state.relay.send(&command) {
        Ok(()) => (
            StatusCode::OK,
            Json(CommandReceipt {
                status: "accepted",
                device_id: command.device_id.to_string(),
                command: command.command,
            }),
        )
            .into_response(),
        Err(error) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiError {
                error: "relay_failed",
                message: error.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Portal action receipt payload.
#[derive(Debug, Serialize)]
struct ActionReceipt {
    /// Acceptance label.
    status: &'static str,
    /// Action performed.
    action: &'static str,
    /// Caller that performed the action.
    subject: String,
}

/// Applies a price change on behalf of the caller.
async fn price_change(Extension(identity): Extension<Identity>) -> Json<ActionReceipt> {
    Json(ActionReceipt {
        status: "ok",
        action: ACTION_PRICE_CHANGE,
        subject: identity.username,
    })
}

/// Orders stock on behalf of the caller.
async fn order_stock(Extension(identity): Extension<Identity>) -> Json<ActionReceipt> {
    Json(ActionReceipt {
        status: "ok",
        action: ACTION_ORDER_STOCK,
        subject: identity.username,
    })
}

/// Farm view payload.
#[derive(Debug, Serialize)]
struct FarmView {
    /// Farm resource identifier.
    farm: String,
    /// Caller viewing the farm.
    viewer: String,
}

/// Shows a farm to an authenticated caller.
async fn farm(
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Json<FarmView> {
    Json(FarmView {
        farm: id,
        viewer: identity.username,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
