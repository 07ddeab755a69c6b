//! In-memory course repository.
//!
//! # Responsibility
//! - Provide a process-local store with the same contract as SQLite, for
//!   tests and embedding without a database file.
//!
//! # Invariants
//! - Uniqueness is checked and the write applied under one lock acquisition.
//! - Ids increase monotonically and are never reused, matching
//!   `AUTOINCREMENT`.
//! - Description matching mirrors SQLite `LIKE` (ASCII case-insensitive).

use crate::model::course::{Course, CourseDraft, CourseId};
use crate::repo::course_repo::{CourseRepository, RepoError, RepoResult};
use crate::repo::now_epoch_ms;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: CourseId,
    courses: BTreeMap<CourseId, Course>,
}

impl MemoryState {
    fn conflicting_id(
        &self,
        subject: &str,
        course_number: &str,
        excluding: Option<CourseId>,
    ) -> Option<CourseId> {
        self.courses
            .values()
            .find(|course| {
                Some(course.id) != excluding
                    && course.subject == subject
                    && course.course_number == course_number
            })
            .map(|course| course.id)
    }
}

/// `Mutex`-guarded in-memory course store.
#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RepoError::Unavailable("in-memory course store lock poisoned"))
    }
}

impl CourseRepository for InMemoryCourseRepository {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        Ok(self.lock()?.courses.values().cloned().collect())
    }

    fn find_by_description(&self, text: &str) -> RepoResult<Vec<Course>> {
        let needle = text.to_ascii_lowercase();
        Ok(self
            .lock()?
            .courses
            .values()
            .filter(|course| {
                course
                    .description
                    .as_deref()
                    .is_some_and(|description| {
                        description.to_ascii_lowercase().contains(&needle)
                    })
            })
            .cloned()
            .collect())
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        Ok(self.lock()?.courses.get(&id).cloned())
    }

    fn find_conflicting_course(
        &self,
        subject: &str,
        course_number: &str,
        excluding: Option<CourseId>,
    ) -> RepoResult<Option<CourseId>> {
        Ok(self
            .lock()?
            .conflicting_id(subject, course_number, excluding))
    }

    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course> {
        let mut state = self.lock()?;
        if state
            .conflicting_id(&draft.subject, &draft.course_number, None)
            .is_some()
        {
            return Err(RepoError::UniqueViolation);
        }

        state.last_id += 1;
        let now = now_epoch_ms();
        let course = Course {
            id: state.last_id,
            subject: draft.subject.clone(),
            course_number: draft.course_number.clone(),
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }

    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<Course> {
        let mut state = self.lock()?;
        if !state.courses.contains_key(&id) {
            return Err(RepoError::NotFound(id));
        }
        if state
            .conflicting_id(&draft.subject, &draft.course_number, Some(id))
            .is_some()
        {
            return Err(RepoError::UniqueViolation);
        }

        let course = state.courses.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        course.subject = draft.subject.clone();
        course.course_number = draft.course_number.clone();
        course.description = draft.description.clone();
        course.updated_at = now_epoch_ms();
        Ok(course.clone())
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        self.lock()?
            .courses
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}
