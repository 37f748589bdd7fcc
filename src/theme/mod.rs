//! Theme descriptors handed to the template renderer.
//!
//! A `ThemeDescriptor` bundles the document text and style with the theme
//! metadata the renderer reads. Its `base_theme` is always present: the
//! renderer dereferences it unconditionally, so local previews carry a
//! synthetic record even though no theme database backs it.

pub mod compiler;

use serde::Serialize;

use crate::config::{PREVIEW_RENDERER, PREVIEW_THEME, PREVIEW_THEME_PATH, PREVIEW_TITLE};

/// Nested base-theme record. Serialized under `_theme`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseThemeDescriptor {
    pub title: String,
    pub renderer: String,
    #[serde(rename = "path")]
    pub stylesheet_path: String,
    pub style: String,
}

impl BaseThemeDescriptor {
    /// The fixed base theme of a local preview.
    pub fn local_preview() -> Self {
        Self {
            title: PREVIEW_THEME.to_string(),
            renderer: PREVIEW_RENDERER.to_string(),
            stylesheet_path: PREVIEW_THEME_PATH.to_string(),
            style: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeDescriptor {
    pub title: String,
    pub text: String,
    pub style: String,
    pub renderer: String,
    pub theme: String,
    #[serde(rename = "_theme")]
    pub base_theme: BaseThemeDescriptor,
    pub authors: Vec<String>,
    pub systems: Vec<String>,
}

impl ThemeDescriptor {
    /// Descriptor for the local preview of `text`. A missing style is empty.
    pub fn local_preview(text: String, style: Option<String>) -> Self {
        Self {
            title: PREVIEW_TITLE.to_string(),
            text,
            style: style.unwrap_or_default(),
            renderer: PREVIEW_RENDERER.to_string(),
            theme: PREVIEW_THEME.to_string(),
            base_theme: BaseThemeDescriptor::local_preview(),
            authors: Vec::new(),
            systems: Vec::new(),
        }
    }
}

/// Mode flags passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderFlags {
    pub development: bool,
    pub local: bool,
    pub deployment: bool,
    #[serde(rename = "isUser")]
    pub is_user: bool,
}

impl RenderFlags {
    pub const LOCAL_DEVELOPMENT: Self = Self {
        development: true,
        local: true,
        deployment: false,
        is_user: true,
    };
}

/// Everything the renderer sees for one request.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    #[serde(rename = "brew")]
    pub descriptor: ThemeDescriptor,
    /// Request path and query, informational only
    pub url: String,
    pub config: RenderFlags,
}

impl RenderContext {
    pub fn local(descriptor: ThemeDescriptor, url: impl Into<String>) -> Self {
        Self {
            descriptor,
            url: url.into(),
            config: RenderFlags::LOCAL_DEVELOPMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_style_defaults_to_empty() {
        let descriptor = ThemeDescriptor::local_preview("# Hello".to_string(), None);
        assert_eq!(descriptor.text, "# Hello");
        assert_eq!(descriptor.style, "");
        assert_eq!(descriptor.title, PREVIEW_TITLE);
    }

    #[test]
    fn test_descriptor_ignores_content_for_identity() {
        let a = ThemeDescriptor::local_preview("a".to_string(), None);
        let b = ThemeDescriptor::local_preview("b".to_string(), Some("p {}".to_string()));
        assert_eq!(a.theme, b.theme);
        assert_eq!(a.base_theme, b.base_theme);
    }

    #[test]
    fn test_context_serializes_renderer_shape() {
        let descriptor = ThemeDescriptor::local_preview("text".to_string(), Some("p{}".to_string()));
        let context = RenderContext::local(descriptor, "/share/abc?x=1");

        let value = serde_json::to_value(&context).unwrap();
        assert_eq!(
            value,
            json!({
                "brew": {
                    "title": "Preview Local",
                    "text": "text",
                    "style": "p{}",
                    "renderer": "V3",
                    "theme": "5ePHB",
                    "_theme": {
                        "title": "5ePHB",
                        "renderer": "V3",
                        "path": "themes/V3/5ePHB/style.less",
                        "style": ""
                    },
                    "authors": [],
                    "systems": []
                },
                "url": "/share/abc?x=1",
                "config": {
                    "development": true,
                    "local": true,
                    "deployment": false,
                    "isUser": true
                }
            })
        );
    }
}
