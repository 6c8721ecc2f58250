use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::enrollments::EnrollOutcome;
use crate::schemas::course::CourseSummary;
use crate::schemas::user::UserResponse;
use crate::schemas::DetailResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/courses/:course_id/enroll", post(enroll_self))
        .route("/courses/:course_id/students", get(list_course_students))
        .route("/students/:student_id/enroll", post(enroll_student))
        .route("/students/:student_id/courses", get(list_student_courses))
}

#[derive(Debug, Deserialize)]
struct EnrollRequest {
    course_id: String,
}

async fn enroll_self(
    Path(course_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<DetailResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let outcome = repositories::enrollments::enroll(
        state.db(),
        &Uuid::new_v4().to_string(),
        &course.id,
        &student.id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to enroll student"))?;

    if outcome == EnrollOutcome::AlreadyEnrolled {
        return Err(ApiError::Conflict("Already enrolled".to_string()));
    }

    tracing::info!(
        student_id = %student.id,
        course_id = %course.id,
        action = "enroll",
        "Student enrolled in course"
    );

    Ok(Json(DetailResponse { detail: format!("Enrolled in course {}", course.name) }))
}

/// Enrollment by student id, kept for surface compatibility. Both anchors
/// must exist and the target user must actually be a student.
async fn enroll_student(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<EnrollRequest>,
) -> Result<Json<DetailResponse>, ApiError> {
    let student = repositories::users::find_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .filter(|user| user.role == UserRole::Student);

    let course = repositories::courses::find_by_id(state.db(), &payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let (Some(student), Some(course)) = (student, course) else {
        return Err(ApiError::NotFound("Student or Course not found".to_string()));
    };

    let outcome = repositories::enrollments::enroll(
        state.db(),
        &Uuid::new_v4().to_string(),
        &course.id,
        &student.id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to enroll student"))?;

    if outcome == EnrollOutcome::AlreadyEnrolled {
        return Err(ApiError::Conflict("Already enrolled".to_string()));
    }

    Ok(Json(DetailResponse {
        detail: format!("Student {} enrolled in {}", student.name, course.name),
    }))
}

async fn list_course_students(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let students = repositories::enrollments::list_students_for_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrolled students"))?;

    Ok(Json(students.into_iter().map(UserResponse::from_db).collect()))
}

/// Single well-defined listing (the stricter of the two historical
/// variants): the anchor must exist and hold the student role.
async fn list_student_courses(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseSummary>>, ApiError> {
    let student = repositories::users::find_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .filter(|user| user.role == UserRole::Student);

    if student.is_none() {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    let courses = repositories::enrollments::list_courses_for_student(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrolled courses"))?;

    Ok(Json(courses.into_iter().map(CourseSummary::from_db).collect()))
}
