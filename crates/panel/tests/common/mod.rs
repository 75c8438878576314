#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every test gets its own [`TestWorkspace`] so tests can run in parallel
//! without sharing files.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use atrium_panel::resource::ResourceCatalog;
use atrium_panel::{AppState, Config, PanelManager, routes};
use atrium_test_utils::TestWorkspace;

pub const APP_KEY: &str = "base64:test-application-key";

/// Configuration rooted at the workspace.
pub fn config(workspace: &TestWorkspace) -> Config {
    Config::rooted_at(workspace.root(), APP_KEY)
}

/// Application state over the workspace, with extra registered resources.
pub fn state_with(workspace: &TestWorkspace, catalog: ResourceCatalog) -> AppState {
    AppState::new(config(workspace), catalog).unwrap()
}

pub fn state(workspace: &TestWorkspace) -> AppState {
    state_with(workspace, ResourceCatalog::new())
}

/// A fresh request-scoped manager over the workspace.
pub fn manager(workspace: &TestWorkspace) -> PanelManager {
    state(workspace).manager()
}

/// Test application wrapping the real router.
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new(state: AppState) -> Self {
        Self {
            router: routes::app(state),
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub async fn response_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn response_text(response: Response) -> String {
    String::from_utf8(response_bytes(response).await).unwrap()
}
