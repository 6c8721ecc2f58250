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
use crate::core::time::{primitive_now_utc, to_primitive_utc};
use crate::repositories;
use crate::schemas::assignment::{AssignmentCreate, AssignmentResponse, AssignmentUpdate};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:course_id/assignments",
            get(list_course_assignments).post(create_assignment),
        )
        .route("/assignments/:assignment_id", get(get_assignment).patch(update_assignment))
}

async fn create_assignment(
    Path(course_id): Path<String>,
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    require_course_owner(&state, &lecturer, &course_id).await?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Assignment title must not be empty".to_string()));
    }

    let assignment = repositories::assignments::create(
        state.db(),
        repositories::assignments::CreateAssignment {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            title: payload.title.trim(),
            description: &payload.description,
            due_date: to_primitive_utc(payload.due_date),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assignment"))?;

    Ok((StatusCode::CREATED, Json(AssignmentResponse::from_db(assignment))))
}

async fn get_assignment(
    Path(assignment_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = repositories::assignments::find_by_id(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    Ok(Json(AssignmentResponse::from_db(assignment)))
}

async fn update_assignment(
    Path(assignment_id): Path<String>,
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentUpdate>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = repositories::assignments::find_by_id(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    require_course_owner(&state, &lecturer, &assignment.course_id).await?;

    repositories::assignments::update(
        state.db(),
        &assignment_id,
        repositories::assignments::UpdateAssignment {
            title: payload.title,
            description: payload.description,
            due_date: payload.due_date.map(to_primitive_utc),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update assignment"))?;

    let updated = repositories::assignments::fetch_one_by_id(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated assignment"))?;

    Ok(Json(AssignmentResponse::from_db(updated)))
}

async fn list_course_assignments(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let assignments = repositories::assignments::list_by_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list course assignments"))?;

    Ok(Json(assignments.into_iter().map(AssignmentResponse::from_db).collect()))
}

#[cfg(test)]
mod tests;
