use sqlx::PgPool;

use crate::db::models::Lesson;

const COLUMNS: &str = "id, course_id, title, content, video_url";

pub(crate) struct CreateLesson<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) video_url: Option<&'a str>,
}

pub(crate) async fn create(pool: &PgPool, params: CreateLesson<'_>) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "INSERT INTO lessons (id, course_id, title, content, video_url)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.content)
    .bind(params.video_url)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    lesson_id: &str,
) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("SELECT {COLUMNS} FROM lessons WHERE id = $1"))
        .bind(lesson_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("SELECT {COLUMNS} FROM lessons ORDER BY title"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {COLUMNS} FROM lessons WHERE course_id = $1 ORDER BY title"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct UpdateLesson {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) video_url: Option<String>,
}

/// Partial update: absent fields keep their stored value.
pub(crate) async fn update(
    pool: &PgPool,
    lesson_id: &str,
    params: UpdateLesson,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE lessons SET
            title = COALESCE($1, title),
            content = COALESCE($2, content),
            video_url = COALESCE($3, video_url)
         WHERE id = $4",
    )
    .bind(params.title)
    .bind(params.content)
    .bind(params.video_url)
    .bind(lesson_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, lesson_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM lessons WHERE id = $1").bind(lesson_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, lesson_id: &str) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("SELECT {COLUMNS} FROM lessons WHERE id = $1"))
        .bind(lesson_id)
        .fetch_one(pool)
        .await
}
