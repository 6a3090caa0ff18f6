// farmgate-server/src/identity.rs
// ============================================================================
// Module: Farmgate Identity Resolution
// Description: Bearer-token identity resolution for guarded routes.
// Purpose: Map inbound credentials onto resolved identities.
// Dependencies: farmgate-core, farmgate-config
// ============================================================================

//! ## Overview
//! Token acquisition and refresh belong to the identity provider and stay
//! out of scope; this module only maps an already-issued bearer token onto
//! the identity configured for it. Resolution is lenient: a missing or
//! malformed header yields no identity, and the guard raises the
//! authentication failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use farmgate_config::SecurityConfig;
use farmgate_core::Identity;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted authorization header size in bytes.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Resolver Interface
// ============================================================================

/// Identity resolver consulted once per guarded request.
pub trait IdentityResolver: Send + Sync {
    /// Resolves the authorization header into an identity, if any.
    fn resolve(&self, auth_header: Option<&str>) -> Option<Identity>;
}

// ============================================================================
// SECTION: Token Table Resolver
// ============================================================================

/// Resolver over the configured bearer-token table.
pub struct TokenTableResolver {
    /// Token to identity mapping.
    tokens: BTreeMap<String, Identity>,
}

impl TokenTableResolver {
    /// Builds a resolver from the security configuration.
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        let tokens = config
            .tokens
            .iter()
            .map(|entry| (entry.token.clone(), entry.identity.to_identity()))
            .collect();
        Self {
            tokens,
        }
    }
}

impl IdentityResolver for TokenTableResolver {
    fn resolve(&self, auth_header: Option<&str>) -> Option<Identity> {
        let token = parse_bearer_token(auth_header)?;
        self.tokens.get(&token).cloned()
    }
}

// ============================================================================
// SECTION: Static Resolver
// ============================================================================

/// Resolver returning one fixed identity for every request.
///
/// Used when security is disabled: every caller becomes the configured
/// development identity, mirroring an unsecured portal deployment.
pub struct StaticResolver {
    /// Identity returned for every request.
    identity: Identity,
}

impl StaticResolver {
    /// Creates a resolver over a fixed identity.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self {
            identity,
        }
    }
}

impl IdentityResolver for StaticResolver {
    fn resolve(&self, _auth_header: Option<&str>) -> Option<Identity> {
        Some(self.identity.clone())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a bearer token out of an authorization header.
fn parse_bearer_token(auth_header: Option<&str>) -> Option<String> {
    let header = auth_header?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return None;
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
