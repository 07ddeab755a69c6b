//! Course validation and uniqueness checks.
//!
//! # Responsibility
//! - Check candidate field formats independently of other records.
//! - Detect (`subject`, `course_number`) collisions with other stored courses.
//!
//! # Invariants
//! - Format checks always run against the full proposed field set.
//! - Format failures and uniqueness conflicts stay distinct; callers report
//!   them as different error kinds.
//! - The store's unique index is authoritative. `check_uniqueness` is the
//!   early check that produces field-level messages.

use crate::model::course::{CourseDraft, CourseId};
use crate::repo::course_repo::{CourseRepository, RepoResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::{Display, Formatter};

static COURSE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}$").expect("valid course number regex"));

pub const FIELD_SUBJECT: &str = "subject";
pub const FIELD_COURSE_NUMBER: &str = "courseNumber";

pub const SUBJECT_EMPTY_MESSAGE: &str = "subject cannot be empty";
pub const COURSE_NUMBER_EMPTY_MESSAGE: &str = "courseNumber cannot be empty";
pub const COURSE_NUMBER_FORMAT_MESSAGE: &str =
    "Course number must be a 3-digit number with leading zeros";

/// One failed rule on one candidate field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collision of a candidate with a different stored course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConflict {
    /// Id of the colliding course, when the detecting layer knows it.
    pub conflicting_id: Option<CourseId>,
    /// One message per field of the violated constraint.
    pub errors: Vec<FieldError>,
}

impl UniqueConflict {
    /// Builds the conflict reported for the (`subject`, `courseNumber`) pair.
    pub fn subject_and_number(conflicting_id: Option<CourseId>) -> Self {
        Self {
            conflicting_id,
            errors: vec![
                FieldError::new(FIELD_SUBJECT, "subject must be unique"),
                FieldError::new(FIELD_COURSE_NUMBER, "courseNumber must be unique"),
            ],
        }
    }
}

/// Returns whether `value` is exactly three ASCII digits.
pub fn is_valid_course_number(value: &str) -> bool {
    COURSE_NUMBER_RE.is_match(value)
}

/// Checks candidate field formats.
///
/// Returns every failed rule; an empty list means the candidate is well formed.
pub fn validate_format(candidate: &CourseDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if candidate.subject.trim().is_empty() {
        errors.push(FieldError::new(FIELD_SUBJECT, SUBJECT_EMPTY_MESSAGE));
    }

    if candidate.course_number.is_empty() {
        errors.push(FieldError::new(
            FIELD_COURSE_NUMBER,
            COURSE_NUMBER_EMPTY_MESSAGE,
        ));
    } else if !is_valid_course_number(&candidate.course_number) {
        errors.push(FieldError::new(
            FIELD_COURSE_NUMBER,
            COURSE_NUMBER_FORMAT_MESSAGE,
        ));
    }

    errors
}

/// Looks for another stored course with the candidate's subject and number.
///
/// `excluding` names the course being updated so a record never conflicts
/// with itself.
pub fn check_uniqueness<R: CourseRepository + ?Sized>(
    repo: &R,
    candidate: &CourseDraft,
    excluding: Option<CourseId>,
) -> RepoResult<Option<UniqueConflict>> {
    let conflicting = repo.find_conflicting_course(
        &candidate.subject,
        &candidate.course_number,
        excluding,
    )?;
    Ok(conflicting.map(|id| UniqueConflict::subject_and_number(Some(id))))
}
