//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the course service is built against.
//! - Isolate SQLite query details from service orchestration.
//! - Provide an in-memory store with the same observable semantics.
//!
//! # Invariants
//! - Every implementation enforces (`subject`, `course_number`) uniqueness
//!   itself and reports violations as `RepoError::UniqueViolation`.
//! - `created_at`/`updated_at` are epoch milliseconds taken from
//!   `now_epoch_ms`, never from SQL time functions.
//! - Missing targets are reported as `RepoError::NotFound`, never as
//!   transport errors.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod course_repo;
pub mod memory_repo;

/// Current wall-clock time in epoch milliseconds.
///
/// Both stores stamp `created_at`/`updated_at` from here so they agree on
/// precision.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
