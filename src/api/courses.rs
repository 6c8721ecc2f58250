use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentLecturer};
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::Course;
use crate::repositories;
use crate::schemas::assignment::AssignmentResponse;
use crate::schemas::course::{CourseCreate, CourseResponse};
use crate::schemas::lesson::LessonResponse;
use crate::schemas::user::UserResponse;
use crate::schemas::DetailResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/:course_id", get(get_course).delete(delete_course))
}

async fn create_course(
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Course name must not be empty".to_string()));
    }

    let now = primitive_now_utc();
    // The creating lecturer becomes the owner; there is no cross-lecturer
    // course creation.
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            name: payload.name.trim(),
            description: &payload.description,
            teacher_id: &lecturer.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    let response = hydrate_course(&state, course).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    let mut response = Vec::with_capacity(courses.len());
    for course in courses {
        response.push(hydrate_course(&state, course).await?);
    }

    Ok(Json(response))
}

async fn get_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(hydrate_course(&state, course).await?))
}

async fn delete_course(
    Path(course_id): Path<String>,
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
) -> Result<Json<DetailResponse>, ApiError> {
    require_course_owner(&state, &lecturer, &course_id).await?;

    let deleted = repositories::courses::delete(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;

    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    tracing::info!(
        lecturer_id = %lecturer.id,
        course_id = %course_id,
        action = "course_delete",
        "Lecturer deleted course"
    );

    Ok(Json(DetailResponse {
        detail: format!("Course {course_id} has been deleted successfully."),
    }))
}

/// Assembles the catalog read shape: course row plus its teacher, lessons,
/// assignments and enrolled students.
pub(crate) async fn hydrate_course(
    state: &AppState,
    course: Course,
) -> Result<CourseResponse, ApiError> {
    let teacher = repositories::users::find_by_id(state.db(), &course.teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course teacher"))?
        .ok_or_else(|| ApiError::Internal("Course teacher missing".to_string()))?;

    let lessons = repositories::lessons::list_by_course(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course lessons"))?;

    let assignments = repositories::assignments::list_by_course(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course assignments"))?;

    let students = repositories::enrollments::list_students_for_course(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch enrolled students"))?;

    Ok(CourseResponse {
        id: course.id,
        name: course.name,
        description: course.description,
        teacher: UserResponse::from_db(teacher),
        lessons: lessons.into_iter().map(LessonResponse::from_db).collect(),
        assignments: assignments.into_iter().map(AssignmentResponse::from_db).collect(),
        students: students.into_iter().map(UserResponse::from_db).collect(),
        created_at: format_primitive(course.created_at),
    })
}
