use course_catalog_core::db::migrations::latest_version;
use course_catalog_core::db::open_db_in_memory;
use course_catalog_core::{
    CourseDraft, CourseRepository, InMemoryCourseRepository, RepoError, SqliteCourseRepository,
};
use rusqlite::Connection;

#[test]
fn create_and_get_roundtrip_preserves_leading_zeros() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let created = repo
        .create_course(&CourseDraft::new("Math", "007").with_description("Intro"))
        .unwrap();
    let loaded = repo.get_course(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.course_number, "007");
    assert_eq!(loaded.description.as_deref(), Some("Intro"));
    assert!(loaded.created_at > 0);
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    for number in ["300", "100", "200"] {
        repo.create_course(&CourseDraft::new("CS", number)).unwrap();
    }

    let numbers: Vec<_> = repo
        .list_courses()
        .unwrap()
        .into_iter()
        .map(|course| course.course_number)
        .collect();
    assert_eq!(numbers, ["300", "100", "200"]);
}

#[test]
fn storage_rejects_duplicate_pair_without_precheck() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    repo.create_course(&CourseDraft::new("Math", "101")).unwrap();

    let err = repo
        .create_course(&CourseDraft::new("Math", "101").with_description("again"))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation), "{err}");
}

#[test]
fn update_into_taken_pair_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    repo.create_course(&CourseDraft::new("Math", "101")).unwrap();
    let other = repo.create_course(&CourseDraft::new("Math", "102")).unwrap();

    let err = repo
        .update_course(other.id, &CourseDraft::new("Math", "101"))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation));
}

#[test]
fn subject_comparison_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    repo.create_course(&CourseDraft::new("Math", "101")).unwrap();

    repo.create_course(&CourseDraft::new("MATH", "101")).unwrap();
    assert_eq!(repo.list_courses().unwrap().len(), 2);
}

#[test]
fn find_conflicting_course_honors_exclusion() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    let course = repo.create_course(&CourseDraft::new("Math", "101")).unwrap();

    assert_eq!(
        repo.find_conflicting_course("Math", "101", None).unwrap(),
        Some(course.id)
    );
    assert_eq!(
        repo.find_conflicting_course("Math", "101", Some(course.id))
            .unwrap(),
        None
    );
    assert_eq!(
        repo.find_conflicting_course("Math", "102", None).unwrap(),
        None
    );
}

#[test]
fn description_filter_treats_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    repo.create_course(&CourseDraft::new("Econ", "101").with_description("100% pass rate"))
        .unwrap();
    repo.create_course(&CourseDraft::new("Econ", "102").with_description("1000 pages"))
        .unwrap();
    repo.create_course(&CourseDraft::new("Econ", "103").with_description("snake_case"))
        .unwrap();
    repo.create_course(&CourseDraft::new("Econ", "104").with_description("snakeXcase"))
        .unwrap();

    let percent = repo.find_by_description("0%").unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].course_number, "101");

    let underscore = repo.find_by_description("e_c").unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].course_number, "103");
}

#[test]
fn sqlite_and_memory_stores_agree_on_description_matching() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteCourseRepository::try_new(&conn).unwrap();
    let memory = InMemoryCourseRepository::new();
    let stores: [&dyn CourseRepository; 2] = [&sqlite, &memory];

    for store in stores {
        store
            .create_course(&CourseDraft::new("Math", "101").with_description("Intro to Math"))
            .unwrap();
        store
            .create_course(&CourseDraft::new("Bio", "101").with_description("Cells"))
            .unwrap();
        store.create_course(&CourseDraft::new("Art", "101")).unwrap();
    }

    for query in ["math", "MATH", "Intro", "", "zzz"] {
        let from_sqlite: Vec<_> = sqlite
            .find_by_description(query)
            .unwrap()
            .into_iter()
            .map(|course| course.subject)
            .collect();
        let from_memory: Vec<_> = memory
            .find_by_description(query)
            .unwrap()
            .into_iter()
            .map(|course| course.subject)
            .collect();
        assert_eq!(from_sqlite, from_memory, "query {query:?}");
    }
}

#[test]
fn delete_is_hard_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    let course = repo.create_course(&CourseDraft::new("Math", "101")).unwrap();

    repo.delete_course(course.id).unwrap();
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM courses;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);

    let err = repo.delete_course(course.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == course.id));
}

#[test]
fn read_rejects_malformed_persisted_course_number() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO courses (subject, course_number) VALUES ('Math', '12');",
        [],
    )
    .unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let err = repo.list_courses().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteCourseRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_courses_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCourseRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("courses"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE courses (
            id INTEGER PRIMARY KEY,
            subject TEXT NOT NULL,
            course_number TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCourseRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "courses",
            column: "description"
        })
    ));
}
