use std::collections::HashMap;

use tera::Tera;

use crate::error::AppError;
use crate::theme::RenderContext;

/// Built-in document template, used unless a template directory overrides it
const HOMEBREW_TEMPLATE: &str = include_str!("../templates/homebrew.html");

/// Turns a render context into a complete HTML document.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, kind: &str, title: &str, context: &RenderContext) -> Result<String, AppError>;
}

/// Renders `{kind}.html` with Tera.
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn new(tera: Tera) -> Self {
        Self { tera }
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, kind: &str, title: &str, context: &RenderContext) -> Result<String, AppError> {
        let mut ctx = tera::Context::new();
        ctx.insert("title", title);
        ctx.insert("brew", &context.descriptor);
        ctx.insert("url", &context.url);
        ctx.insert("config", &context.config);
        ctx.insert("props", context);

        Ok(self.tera.render(&format!("{}.html", kind), &ctx)?)
    }
}

/// Initialize the Tera template engine.
///
/// Templates matching `glob` are loaded first; the built-in `homebrew.html`
/// fills in when the glob does not provide one.
pub fn init_templates(glob: Option<&str>) -> Result<Tera, AppError> {
    let mut tera = match glob {
        Some(glob) => Tera::new(glob)?,
        None => Tera::default(),
    };

    if !tera.get_template_names().any(|name| name == "homebrew.html") {
        tera.add_raw_template("homebrew.html", HOMEBREW_TEMPLATE)?;
    }

    tera.register_filter("script_safe", script_safe_filter);

    Ok(tera)
}

/// Escape `</` so a value can sit inside `<script>` or `<style>` without
/// closing the element early
fn script_safe_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("script_safe filter expects a string"))?;

    Ok(tera::Value::String(s.replace("</", "<\\/")))
}
