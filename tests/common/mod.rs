//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use brew_preview::config::AppConfig;
use brew_preview::routes::create_router;
use brew_preview::state::AppState;
use brew_preview::templates::{init_templates, TemplateRenderer, TeraRenderer};

/// A throwaway preview root with its own configuration.
pub struct Fixture {
    pub dir: TempDir,
    pub config: AppConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.paths.root = dir.path().to_path_buf();
        config.http.host = "127.0.0.1".to_string();
        config.http.port = 0;
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root().join(rel)).unwrap()
    }

    pub fn router(&self) -> Router {
        let renderer = TeraRenderer::new(init_templates(None).unwrap());
        self.router_with(Arc::new(renderer))
    }

    pub fn router_with(&self, renderer: Arc<dyn TemplateRenderer>) -> Router {
        create_router(AppState::new(self.config.clone(), renderer))
    }
}

/// Send a GET request and return status, cache-control and body.
pub async fn get(router: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let cache_control = response
        .headers()
        .get(axum::http::header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, cache_control, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Parse the JSON props embedded in a rendered preview page.
pub fn props(body: &str) -> serde_json::Value {
    let start = body.find(PROPS_PREFIX).expect("props script") + PROPS_PREFIX.len();
    let len = body[start..].find(PROPS_SUFFIX).expect("props script end");
    serde_json::from_str(&body[start..start + len]).unwrap()
}

const PROPS_PREFIX: &str = "window.__PROPS__ = ";
const PROPS_SUFFIX: &str = ";</script>";
