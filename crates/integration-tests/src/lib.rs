//! Integration tests for Hackvote.
//!
//! Requests are driven through the full router with `tower::ServiceExt`
//! against an in-memory store, so no database or network is required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hackvote-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `voting` - Vote acceptance under both policies
//! - `coupon_email` - Coupon registration
//! - `metrics` - Metrics snapshot invariants
//! - `admin` - Project creation, listings, exports, health checks

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use hackvote_core::{ProjectCategory, VotePolicy};
use hackvote_server::db::{MemoryStore, VoteStore};
use hackvote_server::models::{NewProject, Project};
use hackvote_server::state::AppState;

/// Router plus direct access to its backing store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// The body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    /// A response header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestContext {
    /// Fresh empty store with the given policy.
    #[must_use]
    pub fn new(policy: VotePolicy) -> Self {
        Self::with_store(MemoryStore::new(), policy)
    }

    /// Use a preconfigured store.
    #[must_use]
    pub fn with_store(store: MemoryStore, policy: VotePolicy) -> Self {
        let store = Arc::new(store);
        let state = AppState::new(store.clone(), policy);
        Self {
            store,
            app: hackvote_server::app(state),
        }
    }

    /// Send a request and buffer the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET a path.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST a JSON body.
    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.post_raw(uri, &body.to_string(), &[]).await
    }

    /// POST a raw body labelled as JSON, with extra headers.
    pub async fn post_raw(
        &self,
        uri: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::from(body.to_owned())).unwrap())
            .await
    }

    /// POST a vote for `project_id` from `ip`.
    pub async fn vote(&self, project_id: &str, ip: &str) -> TestResponse {
        let body = serde_json::json!({ "projectId": project_id }).to_string();
        self.post_raw("/vote", &body, &[("x-forwarded-for", ip)])
            .await
    }

    /// Insert a project directly into the store.
    pub async fn project(&self, title: &str, category: ProjectCategory) -> Project {
        self.store
            .create_project(NewProject {
                title: title.to_owned(),
                description: format!("{title} description"),
                team_name: format!("Team {title}"),
                category,
                image_url: None,
                demo_url: None,
                github_url: None,
            })
            .await
            .unwrap()
    }
}
