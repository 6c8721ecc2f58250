use sqlx::PgPool;

use crate::db::models::Submission;

const COLUMNS: &str = "id, file_path, submitted_at, user_id, assignment_id, reviewed";

pub(crate) struct CreateSubmission<'a> {
    pub(crate) id: &'a str,
    pub(crate) file_path: &'a str,
    pub(crate) submitted_at: time::PrimitiveDateTime,
    pub(crate) user_id: &'a str,
    pub(crate) assignment_id: &'a str,
}

/// Every call inserts a fresh row; resubmissions accumulate.
pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (id, file_path, submitted_at, user_id, assignment_id, reviewed)
         VALUES ($1,$2,$3,$4,$5,FALSE)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.file_path)
    .bind(params.submitted_at)
    .bind(params.user_id)
    .bind(params.assignment_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(submission_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions ORDER BY submitted_at"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions WHERE assignment_id = $1 ORDER BY submitted_at"
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_assignment_and_user(
    pool: &PgPool,
    assignment_id: &str,
    user_id: &str,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions
         WHERE assignment_id = $1 AND user_id = $2
         ORDER BY submitted_at"
    ))
    .bind(assignment_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Idempotent: re-reviewing an already reviewed submission is a no-op.
pub(crate) async fn mark_reviewed(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET reviewed = TRUE WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(submission_id)
    .fetch_optional(pool)
    .await
}
