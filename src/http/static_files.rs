//! Prefix-mounted static file serving.
//!
//! Requests are matched against an ordered list of URL prefixes, each backed
//! by a directory. The first prefix that matches serves the request through
//! `ServeDir`, which handles content types, conditional requests and ranges.
//! A miss under a claimed prefix is a 404. Requests matching no prefix fall
//! through to the build root, whose own misses render the preview page.

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::PathsConfig;

/// A single URL prefix served from a directory.
#[derive(Debug, Clone)]
pub struct Mount {
    prefix: &'static str,
    dir: ServeDir,
}

impl Mount {
    pub fn new(prefix: &'static str, dir: impl AsRef<Path>) -> Self {
        Self {
            prefix,
            dir: ServeDir::new(dir),
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Remainder of `path` below this prefix, always starting with '/'.
    fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix)?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

/// Ordered static mounts; the first match wins.
#[derive(Debug, Clone)]
pub struct StaticMounts {
    mounts: Vec<Mount>,
}

impl StaticMounts {
    pub fn new(mounts: Vec<Mount>) -> Self {
        Self { mounts }
    }

    /// Asset, font and compiled-theme mounts of a preview root.
    pub fn from_paths(paths: &PathsConfig) -> Self {
        let assets = paths.assets_dir();
        let fonts = paths.fonts_dir();

        Self::new(vec![
            Mount::new("/assets", &assets),
            Mount::new("/themes/assets", &assets),
            Mount::new("/themes/fonts", &fonts),
            Mount::new("/themes/V3/fonts", &fonts),
            Mount::new("/themes/V3/Blank/fonts", &fonts),
            Mount::new("/fonts", &fonts),
            Mount::new("/themes", paths.build_themes_dir()),
        ])
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.mounts.iter().map(Mount::prefix)
    }

    /// Find the mount claiming `path` and the path below it.
    pub fn find<'a>(&self, path: &'a str) -> Option<(&Mount, &'a str)> {
        self.mounts
            .iter()
            .find_map(|mount| mount.strip(path).map(|rest| (mount, rest)))
    }
}

/// Middleware serving requests claimed by a static mount.
///
/// Unclaimed requests continue to the inner service.
pub async fn static_files_layer(
    State(mounts): State<Arc<StaticMounts>>,
    request: Request,
    next: Next,
) -> Response {
    let Some((mount, rest)) = mounts.find(request.uri().path()) else {
        return next.run(request).await;
    };

    let uri = match rewrite_uri(request.uri(), rest) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(error = %e, "Unroutable static path");
            return axum::http::StatusCode::BAD_REQUEST.into_response();
        }
    };
    tracing::trace!(prefix = mount.prefix, path = %uri.path(), "Serving static file");

    let (mut parts, body) = request.into_parts();
    parts.uri = uri;
    let result: Result<_, Infallible> = mount
        .dir
        .clone()
        .oneshot(Request::from_parts(parts, body))
        .await;

    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Replace the path of `uri` with `path`, keeping the query.
fn rewrite_uri(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    Uri::builder().path_and_query(path_and_query).build()
}

/// Service for the build output root, falling back to `fallback` on a miss.
pub fn build_root_service<F>(paths: &PathsConfig, fallback: F) -> ServeDir<F> {
    ServeDir::new(paths.build_dir()).fallback(fallback)
}
