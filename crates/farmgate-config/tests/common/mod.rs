// farmgate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Support
// Description: Shared fixtures for configuration test suites.
// Purpose: Build minimal valid configurations for mutation-based tests.
// =============================================================================

//! ## Overview
//! Provides a minimal configuration every suite starts from before mutating
//! one field under test.

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use farmgate_config::FarmgateConfig;
use farmgate_config::IdentityConfig;
use farmgate_config::PermissionConfig;
use farmgate_config::TokenIdentityConfig;
use farmgate_config::XacmlConfig;

/// Returns a minimal configuration that validates.
pub fn minimal_config() -> FarmgateConfig {
    let mut config = FarmgateConfig::default();
    config.server.bind = Some("127.0.0.1:3000".to_string());
    config.security.tokens = vec![TokenIdentityConfig {
        token: "token-alice".to_string(),
        identity: manager_identity(),
    }];
    config.policy.basic.permissions = vec![PermissionConfig {
        action: "price-change".to_string(),
        resource: None,
        roles: vec!["manager".to_string()],
    }];
    config
}

/// Returns a manager identity entry.
pub fn manager_identity() -> IdentityConfig {
    IdentityConfig {
        user_id: "alice".to_string(),
        username: "alice".to_string(),
        roles: vec!["manager".to_string()],
    }
}

/// Returns a valid remote engine block.
pub fn xacml_block() -> XacmlConfig {
    XacmlConfig {
        base_url: "http://policy-engine:8080".to_string(),
        domain: "farm".to_string(),
        connect_timeout_ms: 500,
        request_timeout_ms: 2_000,
    }
}
