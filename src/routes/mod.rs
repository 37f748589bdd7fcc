//! HTTP routing for the preview server.
//!
//! Static prefixes are served first; anything else tries the build output
//! root and finally renders the preview page. Static responses may be
//! revalidated, preview pages are never stored.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod preview;

use std::sync::Arc;

use axum::{handler::Handler, middleware, Router};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_PREVIEW, CACHE_CONTROL_STATIC};
use crate::http::static_files::{build_root_service, static_files_layer, StaticMounts};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router: static mounts, build root, then the preview.
pub fn create_router(state: AppState) -> Router {
    let mounts = Arc::new(StaticMounts::from_paths(&state.config.paths));

    let preview = preview::render
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_PREVIEW),
        ))
        .with_state(state.clone());

    Router::new()
        .fallback_service(build_root_service(&state.config.paths, preview))
        .layer(middleware::from_fn_with_state(mounts, static_files_layer))
        // Preview responses already carry their own header
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
