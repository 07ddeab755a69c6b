//! Core logic for the course catalog.
//! This crate owns the course record invariants: field formats, the
//! (`subject`, `course_number`) uniqueness rule and the error taxonomy
//! handed to transports.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use api::{dispatch, CourseRequest, CourseResponse};
pub use config::CatalogConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::course::{Course, CourseDraft, CourseId};
pub use repo::course_repo::{CourseRepository, RepoError, RepoResult, SqliteCourseRepository};
pub use repo::memory_repo::InMemoryCourseRepository;
pub use service::course_service::{CourseError, CourseResult, CourseService};
pub use validation::{check_uniqueness, validate_format, FieldError, UniqueConflict};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
