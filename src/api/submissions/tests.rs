use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support as support;
use crate::test_support::MultipartPart;

#[tokio::test]
async fn student_uploads_submission_file() {
    let ctx = support::setup_test_context().await;
    let lecturer = support::insert_user(
        ctx.state.db(),
        "Prof",
        "prof@example.com",
        UserRole::Lecturer,
        "pw",
    )
    .await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Rust 101", "", &lecturer.id).await;
    let assignment = support::insert_assignment(ctx.state.db(), &course.id, "Homework 1").await;
    let token = support::bearer_token(&student, ctx.state.settings());

    let request = support::multipart_request(
        Method::POST,
        &format!("/assignments/{}/submit", assignment.id),
        Some(&token),
        &[MultipartPart::File("file", "solution.rs", b"fn main() {}")],
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = support::read_json(response).await;
    assert_eq!(body["user_id"], student.id.as_str());
    assert_eq!(body["assignment_id"], assignment.id.as_str());
    assert_eq!(body["reviewed"], false);

    let file_path = body["file_path"].as_str().unwrap();
    assert!(file_path.ends_with("solution.rs"));
    let stored = tokio::fs::read(file_path).await.expect("stored file");
    assert_eq!(stored, b"fn main() {}");
}

#[tokio::test]
async fn submit_without_file_part_rejected() {
    let ctx = support::setup_test_context().await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let token = support::bearer_token(&student, ctx.state.settings());

    let request = support::multipart_request(
        Method::POST,
        "/assignments/whatever/submit",
        Some(&token),
        &[MultipartPart::Text("comment", "no file here")],
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = support::read_json(response).await;
    assert_eq!(body["detail"], "File is required");
}

#[tokio::test]
async fn resubmission_accumulates() {
    let ctx = support::setup_test_context().await;
    let lecturer = support::insert_user(
        ctx.state.db(),
        "Prof",
        "prof@example.com",
        UserRole::Lecturer,
        "pw",
    )
    .await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Rust 101", "", &lecturer.id).await;
    let assignment = support::insert_assignment(ctx.state.db(), &course.id, "Homework 1").await;
    let token = support::bearer_token(&student, ctx.state.settings());

    for attempt in ["draft", "final"] {
        let request = support::multipart_request(
            Method::POST,
            &format!("/assignments/{}/submit", assignment.id),
            Some(&token),
            &[MultipartPart::File("file", "solution.rs", attempt.as_bytes())],
        );
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = support::json_request(
        Method::GET,
        &format!("/assignments/{}/my-submissions", assignment.id),
        Some(&token),
        None,
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn my_submissions_empty_is_ok() {
    let ctx = support::setup_test_context().await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let token = support::bearer_token(&student, ctx.state.settings());

    let request = support::json_request(
        Method::GET,
        "/assignments/never-submitted/my-submissions",
        Some(&token),
        None,
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn metadata_submission_creates_row() {
    let ctx = support::setup_test_context().await;
    let lecturer = support::insert_user(
        ctx.state.db(),
        "Prof",
        "prof@example.com",
        UserRole::Lecturer,
        "pw",
    )
    .await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Rust 101", "", &lecturer.id).await;
    let assignment = support::insert_assignment(ctx.state.db(), &course.id, "Homework 1").await;
    let token = support::bearer_token(&student, ctx.state.settings());

    let request = support::json_request(
        Method::POST,
        "/submissions",
        Some(&token),
        Some(json!({ "assignment_id": assignment.id, "file_path": "uploads/manual.pdf" })),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = support::read_json(response).await;
    assert_eq!(body["file_path"], "uploads/manual.pdf");
    assert_eq!(body["user_id"], student.id.as_str());
}

#[tokio::test]
async fn submission_listings_are_lecturer_only() {
    let ctx = support::setup_test_context().await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let token = support::bearer_token(&student, ctx.state.settings());

    for uri in ["/submission", "/assignments/some-assignment/submissions"] {
        let request = support::json_request(Method::GET, uri, Some(&token), None);
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri {uri}");
    }
}

#[tokio::test]
async fn lecturer_lists_and_fetches_submissions() {
    let ctx = support::setup_test_context().await;
    let lecturer = support::insert_user(
        ctx.state.db(),
        "Prof",
        "prof@example.com",
        UserRole::Lecturer,
        "pw",
    )
    .await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Rust 101", "", &lecturer.id).await;
    let assignment = support::insert_assignment(ctx.state.db(), &course.id, "Homework 1").await;

    let student_token = support::bearer_token(&student, ctx.state.settings());
    let submit = support::multipart_request(
        Method::POST,
        &format!("/assignments/{}/submit", assignment.id),
        Some(&student_token),
        &[MultipartPart::File("file", "solution.rs", b"fn main() {}")],
    );
    let created = support::read_json(ctx.app.clone().oneshot(submit).await.unwrap()).await;
    let submission_id = created["id"].as_str().unwrap().to_string();

    let lecturer_token = support::bearer_token(&lecturer, ctx.state.settings());

    let request = support::json_request(Method::GET, "/submission", Some(&lecturer_token), None);
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let request = support::json_request(
        Method::GET,
        &format!("/submissions/{submission_id}"),
        Some(&lecturer_token),
        None,
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body["id"], submission_id.as_str());

    let request = support::json_request(
        Method::GET,
        &format!("/assignments/{}/submissions", assignment.id),
        Some(&lecturer_token),
        None,
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body[0]["id"], submission_id.as_str());
}

#[tokio::test]
async fn review_is_idempotent() {
    let ctx = support::setup_test_context().await;
    let lecturer = support::insert_user(
        ctx.state.db(),
        "Prof",
        "prof@example.com",
        UserRole::Lecturer,
        "pw",
    )
    .await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Rust 101", "", &lecturer.id).await;
    let assignment = support::insert_assignment(ctx.state.db(), &course.id, "Homework 1").await;

    let student_token = support::bearer_token(&student, ctx.state.settings());
    let submit = support::multipart_request(
        Method::POST,
        &format!("/assignments/{}/submit", assignment.id),
        Some(&student_token),
        &[MultipartPart::File("file", "solution.rs", b"fn main() {}")],
    );
    let created = support::read_json(ctx.app.clone().oneshot(submit).await.unwrap()).await;
    let submission_id = created["id"].as_str().unwrap().to_string();

    let lecturer_token = support::bearer_token(&lecturer, ctx.state.settings());
    for _ in 0..2 {
        let request = support::json_request(
            Method::PATCH,
            &format!("/submissions/{submission_id}/review"),
            Some(&lecturer_token),
            None,
        );
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = support::read_json(response).await;
        assert_eq!(body["reviewed"], true);
    }
}

#[tokio::test]
async fn full_course_lifecycle_over_http() {
    let ctx = support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "name": "Prof. Grace",
                "email": "grace@example.com",
                "password": "teach-well",
                "role": "lecturer"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "grace@example.com", "password": "teach-well" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    let lecturer_token = body["access_token"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::POST,
            "/courses",
            Some(&lecturer_token),
            Some(json!({ "name": "Systems Programming", "description": "In Rust" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = support::read_json(response).await;
    let course_id = body["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::POST,
            &format!("/courses/{course_id}/assignments"),
            Some(&lecturer_token),
            Some(json!({
                "title": "Borrow checker essay",
                "description": "500 words",
                "due_date": "2026-09-15T23:59:00Z"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = support::read_json(response).await;
    let assignment_id = body["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "learn-fast",
                "role": "student"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "learn-fast" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    let student_token = body["access_token"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::POST,
            &format!("/courses/{course_id}/enroll"),
            Some(&student_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(support::multipart_request(
            Method::POST,
            &format!("/assignments/{assignment_id}/submit"),
            Some(&student_token),
            &[MultipartPart::File("file", "essay.md", b"ownership is a discipline")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = support::read_json(response).await;
    let submission_id = body["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::GET,
            &format!("/assignments/{assignment_id}/submissions"),
            Some(&lecturer_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], submission_id.as_str());

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::PATCH,
            &format!("/submissions/{submission_id}/review"),
            Some(&lecturer_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(support::json_request(
            Method::GET,
            &format!("/assignments/{assignment_id}/my-submissions"),
            Some(&student_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["reviewed"], true);
}

#[tokio::test]
async fn failed_submission_insert_removes_stored_file() {
    let ctx = support::setup_test_context().await;
    let student =
        support::insert_user(ctx.state.db(), "Ada", "ada@example.com", UserRole::Student, "pw")
            .await;
    let token = support::bearer_token(&student, ctx.state.settings());

    // Hide the table so the insert fails after the file is stored.
    sqlx::query("ALTER TABLE submissions RENAME TO submissions_hidden")
        .execute(ctx.state.db())
        .await
        .unwrap();

    let upload_dir = std::path::PathBuf::from(&ctx.state.settings().storage().upload_dir);
    let before = std::fs::read_dir(&upload_dir).unwrap().count();

    let request = support::multipart_request(
        Method::POST,
        "/assignments/any/submit",
        Some(&token),
        &[MultipartPart::File("file", "doomed.txt", b"never recorded")],
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let after = std::fs::read_dir(&upload_dir).unwrap().count();
    assert_eq!(after, before);

    sqlx::query("ALTER TABLE submissions_hidden RENAME TO submissions")
        .execute(ctx.state.db())
        .await
        .unwrap();
}

#[tokio::test]
async fn review_unknown_submission_not_found() {
    let ctx = support::setup_test_context().await;
    let lecturer = support::insert_user(
        ctx.state.db(),
        "Prof",
        "prof@example.com",
        UserRole::Lecturer,
        "pw",
    )
    .await;
    let token = support::bearer_token(&lecturer, ctx.state.settings());

    let request = support::json_request(
        Method::PATCH,
        "/submissions/no-such-id/review",
        Some(&token),
        None,
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = support::read_json(response).await;
    assert_eq!(body["detail"], "Submission not found");
}
