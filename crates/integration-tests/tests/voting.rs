//! Integration tests for `POST /vote`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;
use tokio::task::JoinSet;

use hackvote_core::{ProjectCategory, ProjectId, VotePolicy};
use hackvote_integration_tests::TestContext;
use hackvote_server::db::VoteStore;

// =============================================================================
// Strict Policy
// =============================================================================

#[tokio::test]
async fn test_first_vote_is_recorded() {
    let ctx = TestContext::new(VotePolicy::Strict);
    let project = ctx.project("Harbor Lens", ProjectCategory::Iot).await;

    let resp = ctx.vote(&project.id.to_string(), "203.0.113.7").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.json(),
        json!({ "success": true, "message": "Vote recorded successfully" })
    );
    assert_eq!(ctx.store.count_votes().await.unwrap(), 1);
}

#[tokio::test]
async fn test_strict_rejects_second_vote_from_same_voter() {
    let ctx = TestContext::new(VotePolicy::Strict);
    let project = ctx.project("Harbor Lens", ProjectCategory::Iot).await;
    let id = project.id.to_string();

    assert_eq!(ctx.vote(&id, "203.0.113.7").await.status, StatusCode::OK);
    let resp = ctx.vote(&id, "203.0.113.7").await;

    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(
        resp.json()["error"],
        "You have already voted for this project"
    );
    assert_eq!(ctx.store.count_votes().await.unwrap(), 1);
}

#[tokio::test]
async fn test_strict_allows_same_voter_on_other_projects() {
    let ctx = TestContext::new(VotePolicy::Strict);
    let a = ctx.project("A", ProjectCategory::Ai).await;
    let b = ctx.project("B", ProjectCategory::Web3).await;

    assert_eq!(ctx.vote(&a.id.to_string(), "10.1.1.1").await.status, StatusCode::OK);
    assert_eq!(ctx.vote(&b.id.to_string(), "10.1.1.1").await.status, StatusCode::OK);
    assert_eq!(ctx.vote(&a.id.to_string(), "10.2.2.2").await.status, StatusCode::OK);

    assert_eq!(ctx.store.count_votes_for_project(a.id).await.unwrap(), 2);
    assert_eq!(ctx.store.count_votes_for_project(b.id).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_strict_concurrent_duplicates_store_one_vote() {
    let ctx = TestContext::new(VotePolicy::Strict);
    let project = ctx.project("Harbor Lens", ProjectCategory::Iot).await;
    let id = project.id.to_string();

    let ctx = std::sync::Arc::new(ctx);
    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let ctx = ctx.clone();
        let id = id.clone();
        tasks.spawn(async move { ctx.vote(&id, "198.51.100.4").await.status });
    }

    let mut ok = 0;
    let mut conflict = 0;
    while let Some(status) = tasks.join_next().await {
        match status.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflict, 15);
    assert_eq!(ctx.store.count_votes().await.unwrap(), 1);
}

#[tokio::test]
async fn test_requests_without_proxy_headers_share_one_identity() {
    let ctx = TestContext::new(VotePolicy::Strict);
    let project = ctx.project("Harbor Lens", ProjectCategory::Iot).await;
    let body = json!({ "projectId": project.id.to_string() });

    assert_eq!(ctx.post_json("/vote", &body).await.status, StatusCode::OK);
    assert_eq!(
        ctx.post_json("/vote", &body).await.status,
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn test_real_ip_header_identifies_voter() {
    let ctx = TestContext::new(VotePolicy::Strict);
    let project = ctx.project("Harbor Lens", ProjectCategory::Iot).await;
    let body = json!({ "projectId": project.id.to_string() }).to_string();

    let first = ctx
        .post_raw("/vote", &body, &[("x-real-ip", "192.0.2.1")])
        .await;
    let same = ctx
        .post_raw("/vote", &body, &[("x-forwarded-for", "192.0.2.1, 10.0.0.1")])
        .await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(same.status, StatusCode::CONFLICT);
}

// =============================================================================
// Permissive Policy
// =============================================================================

#[tokio::test]
async fn test_permissive_records_every_vote() {
    let ctx = TestContext::new(VotePolicy::Permissive);
    let project = ctx.project("Harbor Lens", ProjectCategory::Iot).await;
    let id = project.id.to_string();

    for _ in 0..5 {
        let resp = ctx.vote(&id, "203.0.113.7").await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    assert_eq!(ctx.store.count_votes_for_project(project.id).await.unwrap(), 5);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_unknown_project_is_not_found_and_not_stored() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let resp = ctx
        .vote(&ProjectId::generate().to_string(), "203.0.113.7")
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json()["error"], "Project not found");
    assert_eq!(ctx.store.count_votes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_project_id_is_not_found() {
    let ctx = TestContext::new(VotePolicy::Permissive);
    ctx.project("Harbor Lens", ProjectCategory::Iot).await;

    let resp = ctx.vote("not-a-uuid", "203.0.113.7").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.store.count_votes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_or_blank_project_id() {
    let ctx = TestContext::new(VotePolicy::Strict);

    for body in [json!({}), json!({ "projectId": "   " }), json!({ "projectId": null })] {
        let resp = ctx.post_json("/vote", &body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.json()["error"], "Project ID is required");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new(VotePolicy::Strict);

    let resp = ctx.post_raw("/vote", "{\"projectId\":", &[]).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.json()["error"].is_string());
}

#[tokio::test]
async fn test_uninitialized_store_is_service_unavailable() {
    let ctx = TestContext::with_store(
        hackvote_server::db::MemoryStore::uninitialized(),
        VotePolicy::Strict,
    );

    let resp = ctx
        .vote(&ProjectId::generate().to_string(), "203.0.113.7")
        .await;

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        resp.json()["error"],
        "Database not initialized. Please run the setup script first."
    );
}
