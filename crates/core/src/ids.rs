//! Identifier and clock contracts
//!
//! The engine treats identifiers as opaque strings and never reads the
//! wall clock directly; both are injected so tests can run fully
//! deterministic (see the sequential fakes in the engine's test fixtures).

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Source of fresh, collision-free opaque identifiers
pub trait IdSource: Send + Sync {
    /// Produce the next identifier
    fn next_id(&self) -> String;
}

/// Production id source: random UUID v4, lowercase hyphenated
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl UuidSource {
    pub fn new() -> Self {
        Self
    }
}

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Source of ISO-8601 UTC timestamps
pub trait Clock: Send + Sync {
    /// Current instant, e.g. `2025-01-01T00:00:00.000Z`
    fn now(&self) -> String;
}

/// Production clock: system time, millisecond precision
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
