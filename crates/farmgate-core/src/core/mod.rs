// farmgate-core/src/core/mod.rs
// ============================================================================
// Module: Farmgate Core Types
// Description: Canonical data model for authorization and notifications.
// Purpose: Group the core type modules behind a single namespace.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types are plain data: identifiers, timestamps, the authorization
//! context consumed by policy decision points, and the notification payload
//! model consumed by the fan-out dispatcher. No I/O happens here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod authz;
pub mod identifiers;
pub mod notification;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use authz::AuthorizationContext;
pub use authz::Decision;
pub use authz::Identity;
pub use authz::ProtectionTier;
pub use identifiers::ActionId;
pub use identifiers::DeviceId;
pub use identifiers::ResourceId;
pub use identifiers::RoleName;
pub use identifiers::SubscriptionType;
pub use identifiers::UserId;
pub use notification::AttrValue;
pub use notification::BroadcastEvent;
pub use notification::Item;
pub use notification::NotificationPayload;
pub use time::Timestamp;
