use serde::Serialize;

use crate::db::models::Lesson;

#[derive(Debug, Serialize)]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) video_url: Option<String>,
}

impl LessonResponse {
    pub(crate) fn from_db(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title,
            content: lesson.content,
            video_url: lesson.video_url,
        }
    }
}
