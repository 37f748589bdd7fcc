//! Preview page and static routing, driven in-process through the router.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;

use brew_preview::config::{ThemeList, CACHE_CONTROL_PREVIEW, CACHE_CONTROL_STATIC};
use brew_preview::error::AppError;
use brew_preview::splice::head_injection;
use brew_preview::templates::TemplateRenderer;
use brew_preview::theme::RenderContext;

use common::{get, props, Fixture};

/// Renderer returning a fixed document, for splice edge cases.
struct FixedRenderer(&'static str);

impl TemplateRenderer for FixedRenderer {
    fn render(&self, _kind: &str, _title: &str, _context: &RenderContext) -> Result<String, AppError> {
        Ok(self.0.to_string())
    }
}

struct FailingRenderer;

impl TemplateRenderer for FailingRenderer {
    fn render(&self, kind: &str, _title: &str, _context: &RenderContext) -> Result<String, AppError> {
        Err(AppError::Template(tera::Error::msg(format!(
            "Template '{}.html' not found",
            kind
        ))))
    }
}

#[tokio::test]
async fn missing_document_is_404_for_any_path() {
    let fixture = Fixture::new();
    let router = fixture.router();

    for path in ["/", "/edit/abc", "/share/x?print=true"] {
        let (status, cache, body) = get(&router, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert!(body.contains("Manual.txt not found"), "{}", body);
        assert_eq!(cache.as_deref(), Some(CACHE_CONTROL_PREVIEW));
    }
}

#[tokio::test]
async fn document_without_style_renders_empty_style() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "# Hello");

    let (status, cache, body) = get(&fixture.router(), "/anything").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some(CACHE_CONTROL_PREVIEW));
    assert!(body.contains("<pre class=\"brewText\"># Hello</pre>"));
    let props = props(&body);
    assert_eq!(props["brew"]["text"], "# Hello");
    assert_eq!(props["brew"]["style"], "");
    assert_eq!(props["brew"]["_theme"]["title"], "5ePHB");
    assert!(!body.contains("brew-style"));
    assert!(body.contains(r#"<link href="/themes/V3/Blank/style.css" rel="stylesheet" type="text/css" />"#));
    assert!(body.contains(r#"<link href="/themes/V3/5ePHB/style.css" rel="stylesheet" type="text/css" />"#));
}

#[tokio::test]
async fn style_file_is_passed_through_raw() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");
    fixture.write("Manual.css", ".page { color: red; }");

    let (status, _, body) = get(&fixture.router(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(props(&body)["brew"]["style"], ".page { color: red; }");
    assert!(body.contains(r#"<style id="brew-style">.page { color: red; }</style>"#));
}

#[tokio::test]
async fn path_only_changes_the_url_field() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "# Same\n\nbody");
    let router = fixture.router();

    let (status_a, _, a) = get(&router, "/a").await;
    let (status_b, _, b) = get(&router, "/b/c").await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_ne!(a, b);

    let mut props_a = props(&a);
    let mut props_b = props(&b);
    assert_eq!(props_a["url"], "/a");
    assert_eq!(props_b["url"], "/b/c");
    props_a["url"] = serde_json::Value::Null;
    props_b["url"] = serde_json::Value::Null;
    assert_eq!(props_a, props_b);

    // Outside the props script the pages are identical
    let strip = |body: &str| body[..body.find("window.__PROPS__").unwrap()].to_string();
    assert_eq!(strip(&a), strip(&b));
}

#[tokio::test]
async fn injection_sits_right_before_head_close() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");

    let (_, _, body) = get(&fixture.router(), "/").await;

    let injection = head_injection(&ThemeList::default());
    let head_end = body.find("</head>").unwrap();
    assert!(body[..head_end].ends_with(&injection));
    assert_eq!(body.matches(&injection).count(), 1);
}

#[tokio::test]
async fn renderer_output_is_otherwise_unchanged() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");
    let document = "<html><head><title>t</title></head><body></head></body></html>";

    let router = fixture.router_with(Arc::new(FixedRenderer(document)));
    let (status, _, body) = get(&router, "/").await;

    assert_eq!(status, StatusCode::OK);
    let injection = head_injection(&ThemeList::default());
    assert_eq!(body, document.replacen("</head>", &format!("{}</head>", injection), 1));
}

#[tokio::test]
async fn document_without_head_marker_is_500() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");

    let router = fixture.router_with(Arc::new(FixedRenderer("<html><body></body></html>")));
    let (status, _, body) = get(&router, "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("no &lt;&#x2F;head&gt; marker"), "{}", body);
}

#[tokio::test]
async fn renderer_failure_is_500_with_message() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");

    let router = fixture.router_with(Arc::new(FailingRenderer));
    let (status, _, body) = get(&router, "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Template rendering error"), "{}", body);
    assert!(body.contains("homebrew"), "{}", body);
}

#[tokio::test]
async fn missing_document_wins_over_renderer_failure() {
    let fixture = Fixture::new();

    let router = fixture.router_with(Arc::new(FailingRenderer));
    let (status, _, _) = get(&router, "/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_prefixes_serve_their_directories() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");
    fixture.write("themes/assets/logo.svg", "<svg/>");
    fixture.write("themes/fonts/Solberry.woff2", "font-bytes");
    let router = fixture.router();

    for path in ["/assets/logo.svg", "/themes/assets/logo.svg"] {
        let (status, cache, body) = get(&router, path).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(body, "<svg/>");
        assert_eq!(cache.as_deref(), Some(CACHE_CONTROL_STATIC));
    }

    for path in [
        "/fonts/Solberry.woff2",
        "/themes/fonts/Solberry.woff2",
        "/themes/V3/fonts/Solberry.woff2",
        "/themes/V3/Blank/fonts/Solberry.woff2",
    ] {
        let (status, _, body) = get(&router, path).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(body, "font-bytes");
    }
}

#[tokio::test]
async fn compiled_theme_served_and_missing_theme_404s() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");
    fixture.write("build/themes/V3/Blank/style.css", ".blank { }");
    let router = fixture.router();

    let (status, _, body) = get(&router, "/themes/V3/Blank/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ".blank { }");

    let (status, _, body) = get(&router, "/themes/V3/5ePHB/style.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.contains("brewText"));
}

#[tokio::test]
async fn build_root_files_take_precedence_over_preview() {
    let fixture = Fixture::new();
    fixture.write("Manual.txt", "text");
    fixture.write("build/bundle.js", "console.log(1);");
    let router = fixture.router();

    let (status, cache, body) = get(&router, "/bundle.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log(1);");
    assert_eq!(cache.as_deref(), Some(CACHE_CONTROL_STATIC));

    let (status, _, body) = get(&router, "/bundle.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("brewText"));
}
