//! Course catalog domain model.
//!
//! # Responsibility
//! - Define the persisted course record and the candidate shape accepted by
//!   create/update use-cases.
//!
//! # Invariants
//! - Every stored course is identified by a store-assigned `CourseId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod course;
