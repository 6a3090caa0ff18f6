// farmgate-server/src/relay.rs
// ============================================================================
// Module: Farmgate Command Relay
// Description: Default relay handing device commands to the IoT agent.
// Purpose: Provide an injectable seam for the device command collaborator.
// Dependencies: farmgate-core
// ============================================================================

//! ## Overview
//! The IoT agent is an external collaborator with a fixed interface;
//! deployments wire their own [`CommandRelay`] client through
//! [`crate::state::ServerState`]. The default relay accepts every command,
//! which is enough for a portal fronting a simulated device fleet.

// ============================================================================
// SECTION: Imports
// ============================================================================

use farmgate_core::CommandRelay;
use farmgate_core::DeviceCommand;
use farmgate_core::RelayError;

// ============================================================================
// SECTION: Accepting Relay
// ============================================================================

/// Relay that accepts every command without forwarding it.
pub struct AckRelay;

impl CommandRelay for AckRelay {
    fn send(&self, _command: &DeviceCommand) -> Result<(), RelayError> {
        Ok(())
    }
}
