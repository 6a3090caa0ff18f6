// farmgate-server/src/state.rs
// ============================================================================
// Module: Farmgate Server State
// Description: Shared state wiring configuration into runtime components.
// Purpose: Construct the selector, dispatcher, and resolver once at start.
// Dependencies: farmgate-config, farmgate-policy, farmgate-dispatch
// ============================================================================

//! ## Overview
//! `ServerState` is built once from validated configuration and shared by
//! every handler behind an `Arc`. It holds no mutable request state; the
//! broadcast channel is the only resource shared across invocations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use farmgate_config::FarmgateConfig;
use farmgate_core::CommandRelay;
use farmgate_core::EventMonitor;
use farmgate_core::Timestamp;
use farmgate_dispatch::BroadcastPublisher;
use farmgate_dispatch::StderrMonitor;
use farmgate_dispatch::SubscriptionDispatcher;
use farmgate_policy::PdpSelector;

use crate::identity::IdentityResolver;
use crate::identity::StaticResolver;
use crate::identity::TokenTableResolver;
use crate::relay::AckRelay;
use crate::server::ServerError;

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared server state.
pub struct ServerState {
    /// Validated configuration, immutable for the process lifetime.
    pub config: FarmgateConfig,
    /// Decision point selector for guarded routes.
    pub selector: PdpSelector,
    /// Identity resolver for inbound credentials.
    pub resolver: Arc<dyn IdentityResolver>,
    /// Subscription dispatcher for webhook notifications.
    pub dispatcher: Arc<SubscriptionDispatcher>,
    /// Broadcast publisher; listeners subscribe through it.
    pub publisher: BroadcastPublisher,
    /// Monitor receiving structured events.
    pub monitor: Arc<dyn EventMonitor>,
    /// Relay for accepted device commands.
    pub relay: Arc<dyn CommandRelay>,
}

impl ServerState {
    /// Builds server state from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when validation or component construction
    /// fails.
    pub fn from_config(config: FarmgateConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let monitor: Arc<dyn EventMonitor> = Arc::new(StderrMonitor);
        let selector = PdpSelector::from_config(&config.policy)
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let resolver: Arc<dyn IdentityResolver> = if config.security.enabled {
            Arc::new(TokenTableResolver::from_config(&config.security))
        } else {
            let identity = config
                .security
                .dev_identity
                .as_ref()
                .ok_or_else(|| {
                    ServerError::Config("disabled security requires a dev identity".to_string())
                })?
                .to_identity();
            Arc::new(StaticResolver::new(identity))
        };
        let publisher = BroadcastPublisher::new(config.notifications.channel_capacity);
        let dispatcher = SubscriptionDispatcher::builder()
            .attributes(config.notifications.attributes.clone())
            .publisher(publisher.clone())
            .shared_monitor(Arc::clone(&monitor))
            .build()
            .map_err(|err| ServerError::Init(err.to_string()))?;
        Ok(Self {
            config,
            selector,
            resolver,
            dispatcher: Arc::new(dispatcher),
            publisher,
            monitor,
            relay: Arc::new(AckRelay),
        })
    }

    /// Replaces the command relay, used by embedders and tests.
    #[must_use]
    pub fn with_relay(mut self, relay: Arc<dyn CommandRelay>) -> Self {
        self.relay = relay;
        self
    }

    /// Replaces the monitor consulted by the guard, used by embedders and
    /// tests. The dispatcher keeps the monitor it was built with.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<dyn EventMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Returns the current wall-clock time as a request timestamp.
    ///
    /// The core never reads wall-clock time; the HTTP layer stamps each
    /// request here.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX));
        Timestamp::from_unix_millis(millis)
    }
}
