// farmgate-core/src/core/time.rs
// ============================================================================
// Module: Farmgate Time Model
// Description: Canonical timestamp representation for authorization requests.
// Purpose: Provide explicit, caller-supplied time values for policy checks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Farmgate uses explicit time values embedded in the authorization context.
//! The core never reads wall-clock time directly; the HTTP layer supplies a
//! timestamp per request. Advanced policies may restrict actions to certain
//! hours of the day, so the timestamp exposes an hour-of-day helper.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Milliseconds in one hour.
const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Hours in one day.
const HOURS_PER_DAY: i64 = 24;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp attached to each authorization request.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads
///   wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(&self) -> i64 {
        self.0
    }

    /// Returns the UTC hour of day in the range `0..=23`.
    #[must_use]
    pub fn hour_of_day(&self) -> u8 {
        let hour = self.0.div_euclid(MILLIS_PER_HOUR).rem_euclid(HOURS_PER_DAY);
        u8::try_from(hour).unwrap_or(0)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
