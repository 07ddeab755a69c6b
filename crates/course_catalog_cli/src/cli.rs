//! Argument model and request execution for the `course-catalog` binary.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use course_catalog_core::db::open_db;
use course_catalog_core::{
    core_version, dispatch, init_logging, CatalogConfig, CourseDraft, CourseId, CourseRequest,
    CourseResponse, CourseService, SqliteCourseRepository,
};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "course-catalog",
    version = core_version(),
    about = "Manage academic course records"
)]
pub struct Cli {
    /// SQLite database file; overrides COURSE_CATALOG_DB_PATH and DB_PATH.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every course.
    List,
    /// List courses whose description contains the given text.
    Filter {
        #[arg(long)]
        description: Option<String>,
    },
    /// Show one course.
    Get { id: CourseId },
    /// Create a course.
    Create(CourseFields),
    /// Replace the fields of an existing course.
    Update {
        id: CourseId,
        #[command(flatten)]
        fields: CourseFields,
    },
    /// Delete a course permanently.
    Delete { id: CourseId },
}

#[derive(Debug, Args)]
pub struct CourseFields {
    #[arg(long)]
    pub subject: String,
    /// Three digits, leading zeros kept (e.g. 007).
    #[arg(long)]
    pub course_number: String,
    #[arg(long)]
    pub description: Option<String>,
}

impl From<CourseFields> for CourseDraft {
    fn from(value: CourseFields) -> Self {
        Self {
            subject: value.subject,
            course_number: value.course_number,
            description: value.description,
        }
    }
}

impl Command {
    fn into_request(self) -> CourseRequest {
        match self {
            Self::List => CourseRequest::List,
            Self::Filter { description } => CourseRequest::Filter { description },
            Self::Get { id } => CourseRequest::Get { id },
            Self::Create(fields) => CourseRequest::Create {
                body: fields.into(),
            },
            Self::Update { id, fields } => CourseRequest::Update {
                id,
                body: fields.into(),
            },
            Self::Delete { id } => CourseRequest::Delete { id },
        }
    }
}

/// Opens the configured store and executes the parsed command.
pub fn run(cli: Cli) -> Result<CourseResponse> {
    let mut config = CatalogConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let repo = SqliteCourseRepository::try_new(&conn).context("course store is not ready")?;
    let service = CourseService::new(repo);

    let request = cli.command.into_request();
    info!(
        "event=cli_request module=cli operation={} core_version={}",
        request.operation(),
        core_version()
    );
    Ok(dispatch(&service, request))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use course_catalog_core::{core_version, CourseDraft, CourseRequest};

    #[test]
    fn version_flag_reports_core_version() {
        assert_eq!(Cli::command().get_version(), Some(core_version()));

        let err = Cli::try_parse_from(["course-catalog", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert!(err.to_string().contains(core_version()));
    }

    #[test]
    fn create_maps_flags_to_draft() {
        let cli = Cli::try_parse_from([
            "course-catalog",
            "create",
            "--subject",
            "Math",
            "--course-number",
            "007",
            "--description",
            "Intro",
        ])
        .unwrap();

        assert_eq!(
            cli.command.into_request(),
            CourseRequest::Create {
                body: CourseDraft::new("Math", "007").with_description("Intro"),
            }
        );
    }

    #[test]
    fn update_takes_positional_id_and_global_db() {
        let cli = Cli::try_parse_from([
            "course-catalog",
            "update",
            "12",
            "--subject",
            "CS",
            "--course-number",
            "250",
            "--db",
            "/tmp/catalog.db",
        ])
        .unwrap();

        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/catalog.db")));
        assert!(matches!(
            cli.command.into_request(),
            CourseRequest::Update { id: 12, ref body } if body.description.is_none()
        ));
    }

    #[test]
    fn filter_without_description_is_passed_through() {
        let cli = Cli::try_parse_from(["course-catalog", "filter"]).unwrap();
        assert!(matches!(cli.command, Command::Filter { description: None }));
    }

    #[test]
    fn create_requires_course_number() {
        let result = Cli::try_parse_from(["course-catalog", "create", "--subject", "Math"]);
        assert!(result.is_err());
    }
}
