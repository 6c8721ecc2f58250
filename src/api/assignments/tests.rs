use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support as support;

#[tokio::test]
async fn owner_creates_assignment() {
    let ctx = support::setup_test_context().await;
    let owner =
        support::insert_user(ctx.state.db(), "Prof", "prof@example.com", UserRole::Lecturer, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Compilers", "", &owner.id).await;
    let token = support::bearer_token(&owner, ctx.state.settings());

    let request = support::json_request(
        Method::POST,
        &format!("/courses/{}/assignments", course.id),
        Some(&token),
        Some(json!({
            "title": "Parser homework",
            "description": "Recursive descent",
            "due_date": "2026-09-15T23:59:00Z"
        })),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = support::read_json(response).await;
    assert_eq!(body["title"], "Parser homework");
    assert_eq!(body["course_id"], course.id.as_str());
    assert_eq!(body["due_date"], "2026-09-15T23:59:00Z");
}

#[tokio::test]
async fn non_owner_lecturer_cannot_write_assignments() {
    let ctx = support::setup_test_context().await;
    let owner =
        support::insert_user(ctx.state.db(), "Owner", "owner@example.com", UserRole::Lecturer, "pw")
            .await;
    let other =
        support::insert_user(ctx.state.db(), "Other", "other@example.com", UserRole::Lecturer, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Compilers", "", &owner.id).await;
    let assignment = support::insert_assignment(ctx.state.db(), &course.id, "Locked").await;
    let other_token = support::bearer_token(&other, ctx.state.settings());

    let request = support::json_request(
        Method::POST,
        &format!("/courses/{}/assignments", course.id),
        Some(&other_token),
        Some(json!({ "title": "Hijack", "due_date": "2026-09-15T23:59:00Z" })),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = support::json_request(
        Method::PATCH,
        &format!("/assignments/{}", assignment.id),
        Some(&other_token),
        Some(json!({ "title": "Hijack" })),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = support::read_json(response).await;
    assert_eq!(body["detail"], "Only the owning lecturer may modify this course");
}

#[tokio::test]
async fn patch_changes_only_provided_fields() {
    let ctx = support::setup_test_context().await;
    let owner =
        support::insert_user(ctx.state.db(), "Prof", "prof@example.com", UserRole::Lecturer, "pw")
            .await;
    let course = support::insert_course(ctx.state.db(), "Compilers", "", &owner.id).await;
    let token = support::bearer_token(&owner, ctx.state.settings());

    let create = support::json_request(
        Method::POST,
        &format!("/courses/{}/assignments", course.id),
        Some(&token),
        Some(json!({
            "title": "Original title",
            "description": "Original description",
            "due_date": "2026-09-15T23:59:00Z"
        })),
    );
    let created = support::read_json(ctx.app.clone().oneshot(create).await.unwrap()).await;
    let assignment_id = created["id"].as_str().unwrap().to_string();

    let patch = support::json_request(
        Method::PATCH,
        &format!("/assignments/{assignment_id}"),
        Some(&token),
        Some(json!({ "title": "Revised title" })),
    );
    let response = ctx.app.clone().oneshot(patch).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::read_json(response).await;
    assert_eq!(body["title"], "Revised title");
    assert_eq!(body["description"], "Original description");
    assert_eq!(body["due_date"], "2026-09-15T23:59:00Z");
}

#[tokio::test]
async fn get_unknown_assignment_not_found() {
    let ctx = support::setup_test_context().await;

    let request = support::json_request(Method::GET, "/assignments/no-such-id", None, None);
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = support::read_json(response).await;
    assert_eq!(body["detail"], "Assignment not found");
}
