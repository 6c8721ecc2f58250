use sqlx::PgPool;

use crate::db::models::{Course, User};

/// Outcome of the conditional enrollment insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnrollOutcome {
    Enrolled,
    AlreadyEnrolled,
}

/// Atomic insert: the UNIQUE (course_id, user_id) constraint is the only
/// membership check. Zero affected rows means the pair already existed,
/// so concurrent enrolls for the same pair cannot both succeed.
pub(crate) async fn enroll(
    pool: &PgPool,
    id: &str,
    course_id: &str,
    user_id: &str,
    enrolled_at: time::PrimitiveDateTime,
) -> Result<EnrollOutcome, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO enrollments (id, course_id, user_id, enrolled_at)
         VALUES ($1,$2,$3,$4)
         ON CONFLICT (course_id, user_id) DO NOTHING",
    )
    .bind(id)
    .bind(course_id)
    .bind(user_id)
    .bind(enrolled_at)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        Ok(EnrollOutcome::Enrolled)
    } else {
        Ok(EnrollOutcome::AlreadyEnrolled)
    }
}

pub(crate) async fn list_students_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT u.id, u.name, u.email, u.hashed_password, u.role, u.created_at
         FROM users u
         JOIN enrollments e ON e.user_id = u.id
         WHERE e.course_id = $1
         ORDER BY e.enrolled_at",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_courses_for_student(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT c.id, c.name, c.description, c.teacher_id, c.created_at, c.updated_at
         FROM courses c
         JOIN enrollments e ON e.course_id = c.id
         WHERE e.user_id = $1
         ORDER BY e.enrolled_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
