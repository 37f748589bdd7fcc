//! Request-side errors and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{} not found", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Rendered document has no {0} marker")]
    MissingSpliceMarker(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Preview failed");
        } else {
            tracing::warn!(error = %self, "Preview unavailable");
        }

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
</head>
<body>
    <h1>Error {}</h1>
    <p>{}</p>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            tera::escape_html(&self.to_string())
        );

        (status, Html(body)).into_response()
    }
}
