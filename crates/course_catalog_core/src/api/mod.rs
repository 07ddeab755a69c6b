//! Request/response contract consumed by transport adapters.
//!
//! # Responsibility
//! - Describe the operations a transport can ask of the catalog.
//! - Run them through `CourseService` and map every outcome to a status code
//!   and JSON body.
//!
//! # Invariants
//! - Unclassified failures answer with a generic 500 body; their detail is
//!   only logged.
//! - Empty list/filter results are successes (`200`, `[]`).

use crate::model::course::{CourseDraft, CourseId};
use crate::repo::course_repo::CourseRepository;
use crate::service::course_service::{CourseError, CourseService, INTERNAL_ERROR_MESSAGE};
use log::{debug, error};
use serde::Serialize;
use serde_json::{json, Value};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

pub const COURSE_DELETED_MESSAGE: &str = "Course deleted";
pub const DESCRIPTION_REQUIRED_MESSAGE: &str = "Course description is required";

/// One catalog operation requested by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRequest {
    List,
    /// `description` is `None` when the caller omitted the parameter.
    Filter { description: Option<String> },
    Get { id: CourseId },
    Create { body: CourseDraft },
    Update { id: CourseId, body: CourseDraft },
    Delete { id: CourseId },
}

impl CourseRequest {
    /// Stable operation label used in log lines.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Filter { .. } => "filter",
            Self::Get { .. } => "get",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Transport-neutral response: an HTTP-style status and a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseResponse {
    pub status: u16,
    pub body: Value,
}

impl CourseResponse {
    fn ok(body: impl Serialize) -> Self {
        Self::with_status(STATUS_OK, body)
    }

    fn with_status(status: u16, body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status, body },
            Err(err) => {
                error!("event=response_encode module=api status=error error={err}");
                Self::message(STATUS_INTERNAL_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }

    fn message(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "message": message }),
        }
    }

    /// Returns whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<CourseError> for CourseResponse {
    fn from(value: CourseError) -> Self {
        match &value {
            CourseError::Validation { errors } | CourseError::UniqueConstraint { errors } => Self {
                status: STATUS_BAD_REQUEST,
                body: json!({
                    "message": value.message(),
                    "errors": errors.iter().map(|err| err.message.as_str()).collect::<Vec<_>>(),
                }),
            },
            CourseError::NotFound(_) => Self::message(STATUS_NOT_FOUND, value.message()),
            CourseError::Unclassified(_) => Self::message(STATUS_INTERNAL_ERROR, value.message()),
        }
    }
}

/// Executes `request` against `service` and maps the outcome.
pub fn dispatch<R: CourseRepository>(
    service: &CourseService<R>,
    request: CourseRequest,
) -> CourseResponse {
    let operation = request.operation();
    let response = match request {
        CourseRequest::List => service.list_all().map(CourseResponse::ok),
        CourseRequest::Filter { description: None } => Ok(CourseResponse::message(
            STATUS_BAD_REQUEST,
            DESCRIPTION_REQUIRED_MESSAGE,
        )),
        CourseRequest::Filter {
            description: Some(text),
        } => service
            .find_by_description_substring(&text)
            .map(CourseResponse::ok),
        CourseRequest::Get { id } => service.find_by_id(id).map(CourseResponse::ok),
        CourseRequest::Create { body } => service
            .create(&body)
            .map(|course| CourseResponse::with_status(STATUS_CREATED, course)),
        CourseRequest::Update { id, body } => service.update(id, &body).map(CourseResponse::ok),
        CourseRequest::Delete { id } => service
            .delete(id)
            .map(|()| CourseResponse::message(STATUS_OK, COURSE_DELETED_MESSAGE)),
    }
    .unwrap_or_else(CourseResponse::from);

    debug!(
        "event=dispatch module=api operation={} status={}",
        operation,
        response.status
    );
    response
}
