//! Course use-case service.
//!
//! # Responsibility
//! - Provide list/filter/get/create/update/delete entry points for callers.
//! - Run format validation and the uniqueness check before writes.
//! - Convert repository failures into `CourseError` kinds.
//!
//! # Invariants
//! - No repository error escapes unclassified; unknown failures become
//!   `CourseError::Unclassified` and are logged here.
//! - A storage-level uniqueness rejection is reported exactly like a
//!   pre-check conflict.
//! - Log lines carry ids and outcomes only, never field contents.

use crate::model::course::{Course, CourseDraft, CourseId};
use crate::repo::course_repo::{CourseRepository, RepoError};
use crate::validation::{check_uniqueness, validate_format, FieldError, UniqueConflict};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const VALIDATION_ERROR_MESSAGE: &str = "Validation error";
pub const UNIQUE_CONSTRAINT_MESSAGE: &str = "Subject and course number must be unique";
pub const NOT_FOUND_MESSAGE: &str = "Course not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub type CourseResult<T> = Result<T, CourseError>;

/// Caller-facing failure kinds for course use-cases.
#[derive(Debug)]
pub enum CourseError {
    /// One or more candidate fields break a format rule.
    Validation { errors: Vec<FieldError> },
    /// (`subject`, `courseNumber`) already belongs to a different course.
    UniqueConstraint { errors: Vec<FieldError> },
    /// No course has the requested id.
    NotFound(CourseId),
    /// Anything else. Detail is for server-side diagnostics only.
    Unclassified(RepoError),
}

impl CourseError {
    /// Top-level message safe to show to clients.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Validation { .. } => VALIDATION_ERROR_MESSAGE,
            Self::UniqueConstraint { .. } => UNIQUE_CONSTRAINT_MESSAGE,
            Self::NotFound(_) => NOT_FOUND_MESSAGE,
            Self::Unclassified(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Field-level detail safe to show to clients.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { errors } | Self::UniqueConstraint { errors } => errors,
            Self::NotFound(_) | Self::Unclassified(_) => &[],
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::UniqueConstraint { .. } => "unique_constraint",
            Self::NotFound(_) => "not_found",
            Self::Unclassified(_) => "unclassified",
        }
    }
}

impl Display for CourseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { errors } | Self::UniqueConstraint { errors } => {
                write!(f, "{}", self.message())?;
                for (index, err) in errors.iter().enumerate() {
                    let separator = if index == 0 { ": " } else { "; " };
                    write!(f, "{separator}{err}")?;
                }
                Ok(())
            }
            Self::NotFound(id) => write!(f, "course not found: {id}"),
            Self::Unclassified(err) => write!(f, "unclassified course failure: {err}"),
        }
    }
}

impl Error for CourseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unclassified(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UniqueConflict> for CourseError {
    fn from(value: UniqueConflict) -> Self {
        Self::UniqueConstraint {
            errors: value.errors,
        }
    }
}

impl From<RepoError> for CourseError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::UniqueViolation => UniqueConflict::subject_and_number(None).into(),
            other => Self::Unclassified(other),
        }
    }
}

/// Course service facade over an injected repository.
pub struct CourseService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> CourseService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every course in storage order. An empty catalog is not an error.
    pub fn list_all(&self) -> CourseResult<Vec<Course>> {
        let result = self.repo.list_courses().map_err(CourseError::from);
        log_list_outcome("course_list", &result);
        result
    }

    /// Lists courses whose description contains `text`.
    pub fn find_by_description_substring(&self, text: &str) -> CourseResult<Vec<Course>> {
        let result = self
            .repo
            .find_by_description(text)
            .map_err(CourseError::from);
        log_list_outcome("course_filter", &result);
        result
    }

    /// Gets one course by id.
    pub fn find_by_id(&self, id: CourseId) -> CourseResult<Course> {
        let result = self
            .repo
            .get_course(id)
            .map_err(CourseError::from)
            .and_then(|course| course.ok_or(CourseError::NotFound(id)));
        log_outcome("course_get", Some(id), &result);
        result
    }

    /// Checks candidate formats and reports failures as `Validation`.
    pub fn validate_format(&self, candidate: &CourseDraft) -> CourseResult<()> {
        let errors = validate_format(candidate);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CourseError::Validation { errors })
        }
    }

    /// Checks the uniqueness invariant, ignoring the course `excluding`.
    pub fn check_uniqueness(
        &self,
        candidate: &CourseDraft,
        excluding: Option<CourseId>,
    ) -> CourseResult<()> {
        match check_uniqueness(&self.repo, candidate, excluding)? {
            Some(conflict) => {
                info!(
                    "event=course_unique_conflict module=service status=rejected conflicting_id={} excluding={}",
                    display_id(conflict.conflicting_id),
                    display_id(excluding)
                );
                Err(conflict.into())
            }
            None => Ok(()),
        }
    }

    /// Validates and stores a new course.
    ///
    /// # Errors
    /// - `Validation` when any field breaks its format rule.
    /// - `UniqueConstraint` when the subject/number pair is taken, whether
    ///   detected by the pre-check or by the store.
    pub fn create(&self, candidate: &CourseDraft) -> CourseResult<Course> {
        let result = self
            .validate_format(candidate)
            .and_then(|()| self.check_uniqueness(candidate, None))
            .and_then(|()| {
                self.repo
                    .create_course(candidate)
                    .map_err(CourseError::from)
            });
        log_outcome(
            "course_create",
            result.as_ref().ok().map(|course| course.id),
            &result,
        );
        result
    }

    /// Replaces all candidate fields of course `id`.
    ///
    /// The course's own id is excluded from the uniqueness scan, so writing
    /// back its current values succeeds.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist; checked before validation.
    /// - `Validation` / `UniqueConstraint` as for [`CourseService::create`].
    pub fn update(&self, id: CourseId, candidate: &CourseDraft) -> CourseResult<Course> {
        let result = self
            .repo
            .get_course(id)
            .map_err(CourseError::from)
            .and_then(|current| current.ok_or(CourseError::NotFound(id)).map(|_| ()))
            .and_then(|()| self.validate_format(candidate))
            .and_then(|()| self.check_uniqueness(candidate, Some(id)))
            .and_then(|()| {
                self.repo
                    .update_course(id, candidate)
                    .map_err(CourseError::from)
            });
        log_outcome("course_update", Some(id), &result);
        result
    }

    /// Deletes course `id` permanently.
    pub fn delete(&self, id: CourseId) -> CourseResult<()> {
        let result = self.repo.delete_course(id).map_err(CourseError::from);
        log_outcome("course_delete", Some(id), &result);
        result
    }
}

fn log_list_outcome(event: &str, result: &CourseResult<Vec<Course>>) {
    match result {
        Ok(courses) => debug!(
            "event={event} module=service status=ok count={}",
            courses.len()
        ),
        Err(err) => log_failure(event, None, err),
    }
}

fn log_outcome<T>(event: &str, id: Option<CourseId>, result: &CourseResult<T>) {
    match result {
        Ok(_) => match id {
            Some(id) => info!("event={event} module=service status=ok id={id}"),
            None => info!("event={event} module=service status=ok"),
        },
        Err(err) => log_failure(event, id, err),
    }
}

fn display_id(id: Option<CourseId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}

fn log_failure(event: &str, id: Option<CourseId>, err: &CourseError) {
    let id = display_id(id);
    match err {
        CourseError::Unclassified(source) => error!(
            "event={event} module=service status=error kind={} id={} error={}",
            err.kind(),
            id,
            source
        ),
        _ => info!(
            "event={event} module=service status=rejected kind={} id={} field_errors={}",
            err.kind(),
            id,
            err.field_errors().len()
        ),
    }
}
