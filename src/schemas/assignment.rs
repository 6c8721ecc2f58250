use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::time::format_primitive;
use crate::db::models::Assignment;

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) due_date: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub(crate) due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) due_date: String,
    pub(crate) created_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            course_id: assignment.course_id,
            title: assignment.title,
            description: assignment.description,
            due_date: format_primitive(assignment.due_date),
            created_at: format_primitive(assignment.created_at),
        }
    }
}
