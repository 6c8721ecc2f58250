use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Course;
use crate::schemas::assignment::AssignmentResponse;
use crate::schemas::lesson::LessonResponse;
use crate::schemas::user::UserResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct CourseCreate {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
}

/// Course with its eagerly loaded teacher, children and roster, matching
/// the catalog read shape.
#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) teacher: UserResponse,
    pub(crate) lessons: Vec<LessonResponse>,
    pub(crate) assignments: Vec<AssignmentResponse>,
    pub(crate) students: Vec<UserResponse>,
    pub(crate) created_at: String,
}

/// Flat course row, used where the roster and children are not needed
/// (a student's enrolled-course list).
#[derive(Debug, Serialize)]
pub(crate) struct CourseSummary {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) teacher_id: String,
    pub(crate) created_at: String,
}

impl CourseSummary {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            teacher_id: course.teacher_id,
            created_at: format_primitive(course.created_at),
        }
    }
}
