//! Course repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filter APIs over the `courses` table.
//! - Translate storage failures into `RepoError` variants.
//!
//! # Invariants
//! - The `courses_subject_course_number_uq` index is the final word on
//!   uniqueness; its violations map to `RepoError::UniqueViolation`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::course::{Course, CourseDraft, CourseId};
use crate::repo::now_epoch_ms;
use crate::validation::is_valid_course_number;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const COURSE_SELECT_SQL: &str = "SELECT
    id,
    subject,
    course_number,
    description,
    created_at,
    updated_at
FROM courses";

const REQUIRED_COURSE_COLUMNS: &[&str] = &[
    "id",
    "subject",
    "course_number",
    "description",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for course persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(CourseId),
    /// Write rejected by the (`subject`, `course_number`) unique constraint.
    UniqueViolation,
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Store cannot serve requests (e.g. poisoned in-memory lock).
    Unavailable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "course not found: {id}"),
            Self::UniqueViolation => {
                write!(f, "unique constraint violated on (subject, course_number)")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted course data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::Unavailable(reason) => write!(f, "course store unavailable: {reason}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if value.is_unique_violation() {
            return Self::UniqueViolation;
        }
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}

/// Storage contract for course records.
///
/// Implementations own the stored state; every method returns copies.
pub trait CourseRepository {
    /// Lists every course in insertion order.
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    /// Lists courses whose description contains `text`.
    ///
    /// Matching is ASCII case-insensitive; courses without a description
    /// never match.
    fn find_by_description(&self, text: &str) -> RepoResult<Vec<Course>>;
    /// Gets one course by id.
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Returns the id of a course other than `excluding` holding the pair.
    fn find_conflicting_course(
        &self,
        subject: &str,
        course_number: &str,
        excluding: Option<CourseId>,
    ) -> RepoResult<Option<CourseId>>;
    /// Inserts a new course and returns the stored record.
    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course>;
    /// Replaces all candidate fields of an existing course.
    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<Course>;
    /// Removes a course permanently.
    fn delete_course(&self, id: CourseId) -> RepoResult<()>;
}

impl<R: CourseRepository + ?Sized> CourseRepository for &R {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        (**self).list_courses()
    }

    fn find_by_description(&self, text: &str) -> RepoResult<Vec<Course>> {
        (**self).find_by_description(text)
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        (**self).get_course(id)
    }

    fn find_conflicting_course(
        &self,
        subject: &str,
        course_number: &str,
        excluding: Option<CourseId>,
    ) -> RepoResult<Option<CourseId>> {
        (**self).find_conflicting_course(subject, course_number, excluding)
    }

    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course> {
        (**self).create_course(draft)
    }

    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<Course> {
        (**self).update_course(id, draft)
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        (**self).delete_course(id)
    }
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   not the one this crate creates.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_course_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_courses(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(parse_course_row(row)?);
        }
        Ok(courses)
    }

    fn read_back(&self, id: CourseId) -> RepoResult<Course> {
        self.get_course(id)?.ok_or(RepoError::NotFound(id))
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        self.query_courses(&format!("{COURSE_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn find_by_description(&self, text: &str) -> RepoResult<Vec<Course>> {
        let pattern = format!("%{}%", escape_like(text));
        self.query_courses(
            &format!(
                "{COURSE_SELECT_SQL}
                 WHERE description LIKE ?1 ESCAPE '\\'
                 ORDER BY id ASC;"
            ),
            [pattern],
        )
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_course_row(row)?));
        }

        Ok(None)
    }

    fn find_conflicting_course(
        &self,
        subject: &str,
        course_number: &str,
        excluding: Option<CourseId>,
    ) -> RepoResult<Option<CourseId>> {
        let id = self
            .conn
            .query_row(
                "SELECT id
                 FROM courses
                 WHERE subject = ?1
                   AND course_number = ?2
                   AND (?3 IS NULL OR id <> ?3)
                 LIMIT 1;",
                params![subject, course_number, excluding],
                |row| row.get::<_, CourseId>(0),
            )
            .optional()?;
        Ok(id)
    }

    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course> {
        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO courses (
                subject,
                course_number,
                description,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?4);",
            params![
                draft.subject.as_str(),
                draft.course_number.as_str(),
                draft.description.as_deref(),
                now,
            ],
        )?;

        self.read_back(self.conn.last_insert_rowid())
    }

    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<Course> {
        let changed = self.conn.execute(
            "UPDATE courses
             SET
                subject = ?1,
                course_number = ?2,
                description = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                draft.subject.as_str(),
                draft.course_number.as_str(),
                draft.description.as_deref(),
                now_epoch_ms(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.read_back(id)
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM courses WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let id: CourseId = row.get("id")?;
    let course_number: String = row.get("course_number")?;
    if !is_valid_course_number(&course_number) {
        return Err(RepoError::InvalidData(format!(
            "invalid course number `{course_number}` in courses.course_number for id {id}"
        )));
    }

    Ok(Course {
        id,
        subject: row.get("subject")?,
        course_number,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Escapes `LIKE` wildcards so `text` matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn ensure_course_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "courses")? {
        return Err(RepoError::MissingRequiredTable("courses"));
    }

    for &column in REQUIRED_COURSE_COLUMNS {
        if !table_has_column(conn, "courses", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "courses",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
