use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Submission;

/// Metadata-only create used by `POST /submissions`; the file is assumed
/// to be already stored and referenced by path.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCreate {
    pub(crate) assignment_id: String,
    pub(crate) file_path: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) file_path: String,
    pub(crate) submitted_at: String,
    pub(crate) user_id: String,
    pub(crate) assignment_id: String,
    pub(crate) reviewed: bool,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: Submission) -> Self {
        Self {
            id: submission.id,
            file_path: submission.file_path,
            submitted_at: format_primitive(submission.submitted_at),
            user_id: submission.user_id,
            assignment_id: submission.assignment_id,
            reviewed: submission.reviewed,
        }
    }
}
