use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentLecturer};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::lesson::LessonResponse;
use crate::schemas::DetailResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/courses/:course_id/lessons", get(list_course_lessons).post(create_lesson))
        .route("/lessons", get(list_lessons))
        .route(
            "/lessons/:lesson_id",
            get(get_lesson).patch(update_lesson).delete(delete_lesson),
        )
}

/// Fields accepted by the lesson multipart forms. On create, title and
/// content are required; on update every field is optional.
struct LessonForm {
    title: Option<String>,
    content: Option<String>,
    video: Option<(String, Vec<u8>)>,
}

async fn create_lesson(
    Path(course_id): Path<String>,
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<LessonResponse>), ApiError> {
    require_course_owner(&state, &lecturer, &course_id).await?;

    let form = read_lesson_form(&state, multipart).await?;
    let title = form.title.ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;
    let content =
        form.content.ok_or_else(|| ApiError::BadRequest("content is required".to_string()))?;

    let video_url = match form.video {
        Some((filename, bytes)) => Some(
            state
                .storage()
                .store_video(&filename, bytes)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to store lesson video"))?,
        ),
        None => None,
    };

    let lesson = repositories::lessons::create(
        state.db(),
        repositories::lessons::CreateLesson {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            title: &title,
            content: &content,
            video_url: video_url.as_deref(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create lesson"))?;

    Ok((StatusCode::CREATED, Json(LessonResponse::from_db(lesson))))
}

async fn list_lessons(State(state): State<AppState>) -> Result<Json<Vec<LessonResponse>>, ApiError> {
    let lessons = repositories::lessons::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?;

    Ok(Json(lessons.into_iter().map(LessonResponse::from_db).collect()))
}

async fn list_course_lessons(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LessonResponse>>, ApiError> {
    let lessons = repositories::lessons::list_by_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list course lessons"))?;

    Ok(Json(lessons.into_iter().map(LessonResponse::from_db).collect()))
}

async fn get_lesson(
    Path(lesson_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    Ok(Json(LessonResponse::from_db(lesson)))
}

async fn update_lesson(
    Path(lesson_id): Path<String>,
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    require_course_owner(&state, &lecturer, &lesson.course_id).await?;

    let form = read_lesson_form(&state, multipart).await?;

    let video_url = match form.video {
        Some((filename, bytes)) => Some(
            state
                .storage()
                .store_video(&filename, bytes)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to store lesson video"))?,
        ),
        None => None,
    };

    repositories::lessons::update(
        state.db(),
        &lesson_id,
        repositories::lessons::UpdateLesson { title: form.title, content: form.content, video_url },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update lesson"))?;

    let updated = repositories::lessons::fetch_one_by_id(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated lesson"))?;

    Ok(Json(LessonResponse::from_db(updated)))
}

async fn delete_lesson(
    Path(lesson_id): Path<String>,
    CurrentLecturer(lecturer): CurrentLecturer,
    State(state): State<AppState>,
) -> Result<Json<DetailResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    require_course_owner(&state, &lecturer, &lesson.course_id).await?;

    let deleted = repositories::lessons::delete(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete lesson"))?;

    if !deleted {
        return Err(ApiError::NotFound("Lesson not found".to_string()));
    }

    Ok(Json(DetailResponse { detail: format!("Lesson {lesson_id} deleted.") }))
}

async fn read_lesson_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<LessonForm, ApiError> {
    let mut form = LessonForm { title: None, content: None, video: None };
    let max_bytes = state.settings().storage().max_upload_size_mb * 1024 * 1024;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid title field".to_string()))?;
                form.title = Some(text);
            }
            "content" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid content field".to_string()))?;
                form.content = Some(text);
            }
            "video" => {
                let filename =
                    field.file_name().map(|s| s.to_string()).unwrap_or_else(|| "video".to_string());
                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read video".to_string()))?
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
                form.video = Some((filename, bytes));
            }
            _ => {}
        }
    }

    Ok(form)
}
