//! Integration tests for project administration, registration exports and
//! health checks.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use hackvote_core::{CouponEmailId, ProjectCategory, VotePolicy};
use hackvote_integration_tests::TestContext;
use hackvote_server::db::{MemoryStore, VoteStore};

// =============================================================================
// Projects
// =============================================================================

#[tokio::test]
async fn test_create_project() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let resp = ctx
        .post_json(
            "/admin/projects",
            &json!({
                "title": "  Harbor Lens ",
                "description": "Counts fishing boats in port",
                "team_name": "Umi",
                "category": "IoT",
                "github_url": "https://github.com/umi/harbor-lens",
                "demo_url": "",
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["message"], "Project created successfully");
    assert_eq!(body["project"]["title"], "Harbor Lens");
    assert_eq!(body["project"]["category"], "IoT");
    assert_eq!(body["project"]["demo_url"], serde_json::Value::Null);
    assert!(body["project"]["id"].is_string());

    let listed = ctx.get("/projects").await.json();
    assert_eq!(listed["projects"][0]["title"], "Harbor Lens");
    assert_eq!(listed["projects"][0]["vote_count"], 0);
}

#[tokio::test]
async fn test_create_project_missing_fields() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let resp = ctx
        .post_json(
            "/admin/projects",
            &json!({ "title": "Harbor Lens", "team_name": "Umi", "category": "IoT" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Missing required fields");
    assert!(
        ctx.store
            .list_projects(hackvote_server::db::CreationOrder::Ascending)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_create_project_invalid_category() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let resp = ctx
        .post_json(
            "/admin/projects",
            &json!({
                "title": "Harbor Lens",
                "description": "Counts fishing boats",
                "team_name": "Umi",
                "category": "Robotics",
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Invalid category");
}

#[tokio::test]
async fn test_listing_orders() {
    let ctx = TestContext::new(VotePolicy::Strict);
    let first = ctx.project("First", ProjectCategory::Ai).await;
    ctx.project("Second", ProjectCategory::Web3).await;
    ctx.vote(&first.id.to_string(), "10.0.0.1").await;

    let public = ctx.get("/projects").await.json();
    let admin = ctx.get("/admin/projects").await.json();

    assert_eq!(public["projects"][0]["title"], "First");
    assert_eq!(public["projects"][0]["vote_count"], 1);
    assert_eq!(public["projects"][1]["title"], "Second");
    assert_eq!(admin["projects"][0]["title"], "Second");
    assert_eq!(admin["projects"][1]["title"], "First");
    assert_eq!(admin["projects"][1]["vote_count"], 1);
}

// =============================================================================
// Coupon registrations
// =============================================================================

async fn register(ctx: &TestContext, email: &str, name: Option<&str>) {
    let resp = ctx
        .post_json("/coupon-email", &json!({ "email": email, "name": name }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_emails_newest_first() {
    let ctx = TestContext::new(VotePolicy::Strict);
    register(&ctx, "first@example.com", None).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    register(&ctx, "second@example.com", Some("Ren")).await;

    let body = ctx.get("/admin/emails").await.json();
    let emails = body["emails"].as_array().unwrap();

    assert_eq!(emails.len(), 2);
    assert_eq!(emails[0]["email"], "second@example.com");
    assert_eq!(emails[0]["name"], "Ren");
    assert_eq!(emails[1]["email"], "first@example.com");
}

#[tokio::test]
async fn test_export_csv() {
    let ctx = TestContext::new(VotePolicy::Strict);
    register(&ctx, "fan@example.com", Some("Aoi \"Captain\"")).await;

    let resp = ctx.get("/admin/emails/export").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.header("content-type").unwrap().starts_with("text/csv"));
    assert!(
        resp.header("content-disposition")
            .unwrap()
            .starts_with("attachment; filename=\"coupon-emails-")
    );

    let text = resp.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "\"Email\",\"Name\",\"Registration Date\",\"Coupon Code\""
    );
    assert!(lines[1].starts_with("\"fan@example.com\",\"Aoi \"\"Captain\"\"\","));
    assert!(lines[1].contains(",\"KESENNUMA"));
}

#[tokio::test]
async fn test_coupon_letter() {
    let ctx = TestContext::new(VotePolicy::Strict);
    register(&ctx, "fan@example.com", Some("Aoi")).await;
    let id = ctx.store.list_emails().await.unwrap()[0].id;

    let resp = ctx.get(&format!("/admin/emails/{id}/coupon")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.header("content-type").unwrap().starts_with("text/plain"));
    let letter = resp.text();
    assert!(letter.starts_with("Dear Aoi,"));
    assert!(letter.contains("Your exclusive coupon code: KESENNUMA"));
}

#[tokio::test]
async fn test_coupon_letter_unknown_registration() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let unknown = ctx
        .get(&format!("/admin/emails/{}/coupon", CouponEmailId::generate()))
        .await;
    let malformed = ctx.get("/admin/emails/nope/coupon").await;

    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.json()["error"], "Registration not found");
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_checks() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let live = ctx.get("/health").await;
    let ready = ctx.get("/health/ready").await;

    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.text(), "ok");
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let generated = ctx.get("/health").await;
    let echoed = ctx
        .send(
            axum::http::Request::get("/health")
                .header("x-request-id", "edge-42")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;

    let id = generated.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(echoed.header("x-request-id"), Some("edge-42"));
}

#[tokio::test]
async fn test_admin_reads_on_uninitialized_store() {
    let ctx = TestContext::with_store(MemoryStore::uninitialized(), VotePolicy::Strict);

    assert_eq!(
        ctx.get("/admin/emails").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        ctx.get("/admin/projects").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}
