//! Catch-all preview handler.
//!
//! Every request not served as a static file renders the same document: the
//! text file (required) and its stylesheet (optional) wrapped in the fixed
//! local-preview theme, with the compiled base themes linked in the head.
//! The request path is passed to the renderer but never selects content.

use std::io;
use std::path::Path;

use axum::{extract::State, http::Uri, response::Html};
use tracing::instrument;

use crate::config::DOCUMENT_KIND;
use crate::error::AppError;
use crate::splice::inject_head;
use crate::state::AppState;
use crate::theme::{RenderContext, ThemeDescriptor};

/// Renders the preview page.
#[instrument(name = "preview::render", skip(state))]
pub async fn render(State(state): State<AppState>, uri: Uri) -> Result<Html<String>, AppError> {
    let paths = &state.config.paths;

    let text = read_optional(&paths.document_path())
        .await?
        .ok_or_else(|| AppError::DocumentNotFound(paths.document.clone()))?;
    let style = read_optional(&paths.style_path()).await?;

    let descriptor = ThemeDescriptor::local_preview(text, style);
    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let context = RenderContext::local(descriptor, url);

    let html = state
        .renderer
        .render(DOCUMENT_KIND, &context.descriptor.title, &context)?;
    let html = inject_head(&html, &state.head_injection)?;

    Ok(Html(html))
}

/// Read a text file, treating a missing file as `None`.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing.
async fn read_optional(path: &Path) -> Result<Option<String>, AppError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
