use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentLecturer, CurrentStudent};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::submission::{SubmissionCreate, SubmissionResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(create_submission))
        .route("/submission", get(list_submissions))
        .route("/submissions/:submission_id", get(get_submission))
        .route("/submissions/:submission_id/review", patch(mark_reviewed))
        .route("/assignments/:assignment_id/submit", post(submit_assignment))
        .route("/assignments/:assignment_id/submissions", get(list_assignment_submissions))
        .route("/assignments/:assignment_id/my-submissions", get(list_my_submissions))
}

async fn submit_assignment(
    Path(assignment_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let max_bytes = state.settings().storage().max_upload_size_mb * 1024 * 1024;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
            {
                let next_size = bytes.len() as u64 + chunk.len() as u64;
                if next_size > max_bytes {
                    return Err(ApiError::BadRequest(format!(
                        "File size exceeds {}MB limit",
                        state.settings().storage().max_upload_size_mb
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
            file_bytes = Some(bytes);
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let filename = filename.unwrap_or_else(|| "upload".to_string());

    let file_path = state
        .storage()
        .store_submission_file(&filename, file_bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store submission file"))?;

    let created = repositories::submissions::create(
        state.db(),
        repositories::submissions::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            file_path: &file_path,
            submitted_at: primitive_now_utc(),
            user_id: &student.id,
            assignment_id: &assignment_id,
        },
    )
    .await;

    let submission = match created {
        Ok(submission) => submission,
        Err(e) => {
            // The stored file has no owning row if the insert failed.
            tokio::fs::remove_file(&file_path).await.ok();
            return Err(ApiError::internal(e, "Failed to create submission"));
        }
    };

    tracing::info!(
        student_id = %student.id,
        assignment_id = %assignment_id,
        submission_id = %submission.id,
        action = "submit",
        "Submission stored"
    );

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission))))
}

/// Metadata-only variant: the file reference is supplied by the caller.
async fn create_submission(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    if payload.file_path.trim().is_empty() {
        return Err(ApiError::BadRequest("file_path must not be empty".to_string()));
    }

    let submission = repositories::submissions::create(
        state.db(),
        repositories::submissions::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            file_path: payload.file_path.trim(),
            submitted_at: primitive_now_utc(),
            user_id: &student.id,
            assignment_id: &payload.assignment_id,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create submission"))?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission))))
}

async fn list_submissions(
    CurrentLecturer(_lecturer): CurrentLecturer,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = repositories::submissions::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

async fn get_submission(
    Path(submission_id): Path<String>,
    CurrentLecturer(_lecturer): CurrentLecturer,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = repositories::submissions::find_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(SubmissionResponse::from_db(submission)))
}

async fn list_assignment_submissions(
    Path(assignment_id): Path<String>,
    CurrentLecturer(_lecturer): CurrentLecturer,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = repositories::submissions::list_by_assignment(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

/// An empty list is a normal outcome here, not an error.
async fn list_my_submissions(
    Path(assignment_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = repositories::submissions::list_by_assignment_and_user(
        state.db(),
        &assignment_id,
        &student.id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

async fn mark_reviewed(
    Path(submission_id): Path<String>,
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = repositories::submissions::mark_reviewed(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to mark submission reviewed"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    tracing::info!(
        lecturer_id = %lecturer.id,
        submission_id = %submission.id,
        action = "review",
        "Submission marked reviewed"
    );

    Ok(Json(SubmissionResponse::from_db(submission)))
}

#[cfg(test)]
mod tests;
