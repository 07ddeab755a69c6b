//! Course domain model.
//!
//! # Responsibility
//! - Define the canonical course record returned by every read path.
//! - Define the candidate (`CourseDraft`) that create/update validate.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - `course_number` is kept as text so leading zeros survive (`"007"`).
//! - (`subject`, `course_number`) is unique across stored courses.

use serde::{Deserialize, Serialize};

/// Store-assigned course identifier.
pub type CourseId = i64;

/// Persisted course record.
///
/// Callers only ever hold copies; the repository owns the stored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub subject: String,
    /// Exactly three ASCII digits.
    pub course_number: String,
    pub description: Option<String>,
    /// Epoch milliseconds, set once on insert.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed by every update.
    pub updated_at: i64,
}

impl Course {
    /// Returns the candidate view of this record, without identity or timestamps.
    pub fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            subject: self.subject.clone(),
            course_number: self.course_number.clone(),
            description: self.description.clone(),
        }
    }

    /// Returns whether the candidate fields of this record equal `draft`.
    pub fn matches_draft(&self, draft: &CourseDraft) -> bool {
        self.subject == draft.subject
            && self.course_number == draft.course_number
            && self.description == draft.description
    }
}

/// Proposed field set for create and full-replacement update.
///
/// Missing `subject`/`courseNumber` keys decode as empty strings so that
/// format validation reports them instead of the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub course_number: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CourseDraft {
    pub fn new(subject: impl Into<String>, course_number: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            course_number: course_number.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
