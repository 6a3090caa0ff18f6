// farmgate-config/src/config.rs
// ============================================================================
// Module: Farmgate Configuration
// Description: Configuration loading and validation for Farmgate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: farmgate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. The
//! file is read once at process start and is immutable for the process
//! lifetime; decision logic receives the parsed struct by reference and
//! never reads ambient environment state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use farmgate_core::Decision;
use farmgate_core::Identity;
use farmgate_core::RoleName;
use farmgate_core::UserId;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "farmgate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "FARMGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default maximum HTTP request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;
/// Maximum allowed HTTP request body size in bytes.
pub(crate) const MAX_BODY_BYTES_LIMIT: usize = 10 * 1024 * 1024;
/// Maximum number of bearer token entries.
pub(crate) const MAX_TOKEN_ENTRIES: usize = 64;
/// Maximum length of a bearer token.
pub(crate) const MAX_TOKEN_LENGTH: usize = 256;
/// Maximum number of basic policy permission entries.
pub(crate) const MAX_PERMISSION_ENTRIES: usize = 128;
/// Minimum policy engine connect timeout in milliseconds.
pub(crate) const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum policy engine connect timeout in milliseconds.
pub(crate) const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Minimum policy engine request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum policy engine request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Maximum number of allow-listed notification attributes.
pub(crate) const MAX_NOTIFY_ATTRIBUTES: usize = 64;
/// Maximum length of one notification attribute name.
pub(crate) const MAX_NOTIFY_ATTRIBUTE_LENGTH: usize = 64;
/// Minimum broadcast channel capacity.
pub(crate) const MIN_CHANNEL_CAPACITY: usize = 1;
/// Maximum broadcast channel capacity.
pub(crate) const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// Attributes eligible to trigger a broadcast when no list is configured.
const DEFAULT_NOTIFY_ATTRIBUTES: [&str; 5] =
    ["controlledAsset", "type", "filling", "humidity", "temperature"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("config read failed for {path}: {reason}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying failure description.
        reason: String,
    },
    /// The configuration file exceeds the size limit.
    #[error("config file {path} exceeds {limit} bytes")]
    TooLarge {
        /// Path that failed the limit.
        path: PathBuf,
        /// Maximum allowed size in bytes.
        limit: usize,
    },
    /// The configuration file is not valid TOML for this model.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// The configuration is structurally valid but violates an invariant.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Root Configuration
// ============================================================================

/// Root Farmgate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FarmgateConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Identity and token settings.
    pub security: SecurityConfig,
    /// Policy decision point settings.
    pub policy: PolicyConfig,
    /// Notification fan-out settings.
    pub notifications: NotificationsConfig,
}

impl FarmgateConfig {
    /// Loads configuration from the given path, the `FARMGATE_CONFIG`
    /// environment variable, or the default filename, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds the
    /// size limit, or fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(
            || {
                env::var(CONFIG_ENV_VAR)
                    .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
            },
            Path::to_path_buf,
        );
        let raw = fs::read_to_string(&path).map_err(|err| ConfigError::Io {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        if raw.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path,
                limit: MAX_CONFIG_FILE_SIZE,
            });
        }
        toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates every section against its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.security.validate()?;
        self.policy.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server Configuration
// ============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address, such as `0.0.0.0:3000`. Required to serve.
    pub bind: Option<String>,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
    /// Build label reported by the version endpoint.
    pub git_commit: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            git_commit: "unknown".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validates server limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be in 1..={MAX_BODY_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Security Configuration
// ============================================================================

/// Identity resolved from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// User identifier.
    pub user_id: String,
    /// Display username.
    pub username: String,
    /// Roles granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl IdentityConfig {
    /// Converts the entry into a core identity.
    #[must_use]
    pub fn to_identity(&self) -> Identity {
        Identity {
            user_id: UserId::new(self.user_id.clone()),
            username: self.username.clone(),
            roles: self.roles.iter().map(|role| RoleName::new(role.as_str())).collect(),
        }
    }

    /// Validates the identity fields.
    fn validate(&self, context: &str) -> Result<(), ConfigError> {
        if self.user_id.is_empty() {
            return Err(ConfigError::Invalid(format!("{context}.user_id must not be empty")));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(format!("{context}.username must not be empty")));
        }
        Ok(())
    }
}

/// Bearer token bound to an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenIdentityConfig {
    /// Bearer token value.
    pub token: String,
    /// Identity resolved for the token.
    pub identity: IdentityConfig,
}

/// Identity and token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// When false, every request resolves to the development identity.
    pub enabled: bool,
    /// Bearer tokens accepted by the identity resolver.
    pub tokens: Vec<TokenIdentityConfig>,
    /// Identity used when security is disabled.
    pub dev_identity: Option<IdentityConfig>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tokens: Vec::new(),
            dev_identity: None,
        }
    }
}

impl SecurityConfig {
    /// Validates token limits and the disabled-mode identity.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled && self.dev_identity.is_none() {
            return Err(ConfigError::Invalid(
                "security.enabled=false requires security.dev_identity".to_string(),
            ));
        }
        if self.tokens.len() > MAX_TOKEN_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "security.tokens exceeds {MAX_TOKEN_ENTRIES} entries"
            )));
        }
        for entry in &self.tokens {
            if entry.token.is_empty() || entry.token.len() > MAX_TOKEN_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "security.tokens entries must be 1..={MAX_TOKEN_LENGTH} bytes"
                )));
            }
            entry.identity.validate("security.tokens.identity")?;
        }
        if let Some(identity) = &self.dev_identity {
            identity.validate("security.dev_identity")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Policy Configuration
// ============================================================================

/// One basic policy permission: who may perform an action on a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionConfig {
    /// Action the entry covers.
    pub action: String,
    /// Resource the entry covers; absent means any resource.
    #[serde(default)]
    pub resource: Option<String>,
    /// Roles allowed to perform the action.
    pub roles: Vec<String>,
}

/// Basic decision point settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BasicPolicyConfig {
    /// Decision for actions with no matching permission entry.
    pub default_decision: Decision,
    /// Permission table.
    pub permissions: Vec<PermissionConfig>,
}

impl Default for BasicPolicyConfig {
    fn default() -> Self {
        Self {
            default_decision: Decision::Deny,
            permissions: Vec::new(),
        }
    }
}

impl BasicPolicyConfig {
    /// Validates the permission table.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.permissions.len() > MAX_PERMISSION_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "policy.basic.permissions exceeds {MAX_PERMISSION_ENTRIES} entries"
            )));
        }
        for entry in &self.permissions {
            if entry.action.is_empty() {
                return Err(ConfigError::Invalid(
                    "policy.basic.permissions action must not be empty".to_string(),
                ));
            }
            if entry.roles.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "policy.basic.permissions entry for {} names no roles",
                    entry.action
                )));
            }
        }
        Ok(())
    }
}

/// Remote XACML engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XacmlConfig {
    /// Base URL of the policy engine.
    pub base_url: String,
    /// Policy domain evaluated for this deployment.
    pub domain: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Default connect timeout for the policy engine.
const fn default_connect_timeout_ms() -> u64 {
    500
}

/// Default request timeout for the policy engine.
const fn default_request_timeout_ms() -> u64 {
    2_000
}

impl XacmlConfig {
    /// Validates the engine endpoint and timeout bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "policy.xacml.base_url must start with http:// or https://".to_string(),
            ));
        }
        if self.domain.is_empty() {
            return Err(ConfigError::Invalid(
                "policy.xacml.domain must not be empty".to_string(),
            ));
        }
        if self.connect_timeout_ms < MIN_CONNECT_TIMEOUT_MS
            || self.connect_timeout_ms > MAX_CONNECT_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "policy.xacml.connect_timeout_ms must be in \
                 {MIN_CONNECT_TIMEOUT_MS}..={MAX_CONNECT_TIMEOUT_MS}"
            )));
        }
        if self.request_timeout_ms < MIN_REQUEST_TIMEOUT_MS
            || self.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "policy.xacml.request_timeout_ms must be in \
                 {MIN_REQUEST_TIMEOUT_MS}..={MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Policy decision point settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// When true, tier 3 routes consult the remote XACML engine.
    pub advanced_enabled: bool,
    /// Basic decision point settings.
    pub basic: BasicPolicyConfig,
    /// Remote engine settings, required when `advanced_enabled` is true.
    pub xacml: Option<XacmlConfig>,
}

impl PolicyConfig {
    /// Validates the selector invariants and nested sections.
    ///
    /// The degrade path covers the flag being off; a half-configured engine
    /// fails closed here instead.
    fn validate(&self) -> Result<(), ConfigError> {
        self.basic.validate()?;
        match (self.advanced_enabled, &self.xacml) {
            (true, None) => Err(ConfigError::Invalid(
                "policy.advanced_enabled=true requires a policy.xacml block".to_string(),
            )),
            (_, Some(xacml)) => xacml.validate(),
            (false, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Notifications Configuration
// ============================================================================

/// Notification fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationsConfig {
    /// Attribute names eligible to trigger a broadcast.
    pub attributes: Vec<String>,
    /// Capacity of the broadcast channel.
    pub channel_capacity: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            attributes: DEFAULT_NOTIFY_ATTRIBUTES.iter().map(ToString::to_string).collect(),
            channel_capacity: 256,
        }
    }
}

impl NotificationsConfig {
    /// Validates the allow-list and channel bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.attributes.len() > MAX_NOTIFY_ATTRIBUTES {
            return Err(ConfigError::Invalid(format!(
                "notifications.attributes exceeds {MAX_NOTIFY_ATTRIBUTES} entries"
            )));
        }
        for attribute in &self.attributes {
            if attribute.is_empty() || attribute.len() > MAX_NOTIFY_ATTRIBUTE_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "notifications.attributes entries must be \
                     1..={MAX_NOTIFY_ATTRIBUTE_LENGTH} bytes"
                )));
            }
        }
        if self.channel_capacity < MIN_CHANNEL_CAPACITY
            || self.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ConfigError::Invalid(format!(
                "notifications.channel_capacity must be in \
                 {MIN_CHANNEL_CAPACITY}..={MAX_CHANNEL_CAPACITY}"
            )));
        }
        Ok(())
    }
}
