// farmgate-server/src/server.rs
// ============================================================================
// Module: Farmgate HTTP Server
// Description: Server lifecycle: construction, warnings, and serving.
// Purpose: Bind the portal router and run it on the async runtime.
// Dependencies: farmgate-config, axum, tokio
// ============================================================================

//! ## Overview
//! `FarmgateServer` validates configuration, wires the shared state, and
//! serves the router. A deployment whose tier 3 routes degrade to basic
//! strength gets a startup warning so the weaker posture is visible rather
//! than silent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use farmgate_config::FarmgateConfig;
use thiserror::Error;

use crate::routes::build_router;
use crate::state::ServerState;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server lifecycle errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Farmgate HTTP server instance.
pub struct FarmgateServer {
    /// Shared state behind every handler.
    state: Arc<ServerState>,
}

impl FarmgateServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when validation or initialization fails.
    pub fn from_config(config: FarmgateConfig) -> Result<Self, ServerError> {
        let state = ServerState::from_config(config)?;
        emit_degrade_warning(&state);
        Ok(Self {
            state: Arc::new(state),
        })
    }

    /// Returns the shared state, used by embedders to subscribe listeners.
    #[must_use]
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Serves requests on the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the bind address is missing or the
    /// server fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let bind = self
            .state
            .config
            .server
            .bind
            .clone()
            .ok_or_else(|| ServerError::Config("bind address required".to_string()))?;
        let addr: SocketAddr =
            bind.parse().map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
        let app = build_router(Arc::clone(&self.state));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Warns when tier 3 routes enforce only basic strength.
fn emit_degrade_warning(state: &ServerState) {
    if !state.selector.advanced_active() {
        #[allow(clippy::print_stderr, reason = "Startup warnings go to stderr.")]
        {
            eprintln!(
                "farmgate: WARNING: advanced policy engine not configured; tier 3 routes \
                 enforce basic authorization until policy.advanced_enabled is set"
            );
        }
    }
}
