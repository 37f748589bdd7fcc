//! Startup routine: compile base themes, then bind the listener.
//!
//! `prepare` returns only after every configured theme has been compiled,
//! skipped or has failed, so no request can arrive before the stylesheets
//! it links to are in place.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::{self, ServerError};
use crate::routes::create_router;
use crate::state::AppState;
use crate::templates::TemplateRenderer;
use crate::theme::compiler::{CompiledTheme, ThemeCompiler};

/// A compiled, bound server that has not started accepting yet.
pub struct PreviewServer {
    listener: TcpListener,
    router: Router,
    themes: Vec<CompiledTheme>,
}

impl PreviewServer {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Startup compilation results, in configured order.
    pub fn themes(&self) -> &[CompiledTheme] {
        &self.themes
    }

    /// Accept connections until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        http::serve(self.listener, self.router, shutdown).await
    }
}

/// Compile themes, build the router and bind the listener.
pub async fn prepare(
    config: AppConfig,
    renderer: Arc<dyn TemplateRenderer>,
) -> Result<PreviewServer, ServerError> {
    tracing::info!(count = config.themes.0.len(), "Compiling base themes");
    let themes = ThemeCompiler::from_config(&config)
        .compile_all(&config)
        .await;
    let compiled = themes.iter().filter(|t| t.success()).count();
    tracing::info!(compiled, total = themes.len(), "Base themes ready");

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let router = create_router(AppState::new(config, renderer));

    let listener = TcpListener::bind(&addr).await.map_err(ServerError::Bind)?;

    Ok(PreviewServer {
        listener,
        router,
        themes,
    })
}
