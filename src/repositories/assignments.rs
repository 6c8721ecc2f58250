use sqlx::PgPool;

use crate::db::models::Assignment;

const COLUMNS: &str = "id, course_id, title, description, due_date, created_at";

pub(crate) struct CreateAssignment<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) due_date: time::PrimitiveDateTime,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (id, course_id, title, description, due_date, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.due_date)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
        .bind(assignment_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {COLUMNS} FROM assignments WHERE course_id = $1 ORDER BY due_date"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct UpdateAssignment {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) due_date: Option<time::PrimitiveDateTime>,
}

pub(crate) async fn update(
    pool: &PgPool,
    assignment_id: &str,
    params: UpdateAssignment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE assignments SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            due_date = COALESCE($3, due_date)
         WHERE id = $4",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.due_date)
    .bind(assignment_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
        .bind(assignment_id)
        .fetch_one(pool)
        .await
}
