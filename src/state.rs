//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::splice::head_injection;
use crate::templates::TemplateRenderer;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything here is fixed once startup finishes; requests only read it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub renderer: Arc<dyn TemplateRenderer>,
    /// Stylesheet links and overrides spliced into every preview
    pub head_injection: Arc<str>,
}

impl AppState {
    /// Creates a new application state from the given configuration and renderer.
    pub fn new(config: AppConfig, renderer: Arc<dyn TemplateRenderer>) -> Self {
        let head_injection = head_injection(&config.themes).into();
        Self {
            config: Arc::new(config),
            renderer,
            head_injection,
        }
    }
}
