//! Stylesheet injection into rendered documents.

use crate::config::{ThemeList, PREVIEW_OVERRIDE_CSS, SPLICE_MARKER};
use crate::error::AppError;

/// Insert `insertion` immediately before the first `marker` in `document`.
///
/// Everything else in the document is kept byte for byte. A document without
/// the marker is an error rather than a silently malformed page.
pub fn insert_before_marker(
    document: &str,
    marker: &'static str,
    insertion: &str,
) -> Result<String, AppError> {
    let at = document
        .find(marker)
        .ok_or(AppError::MissingSpliceMarker(marker))?;

    let mut out = String::with_capacity(document.len() + insertion.len());
    out.push_str(&document[..at]);
    out.push_str(insertion);
    out.push_str(&document[at..]);
    Ok(out)
}

/// Markup spliced into every preview head: one link per compiled base theme,
/// in configured order, then the preview override rules.
pub fn head_injection(themes: &ThemeList) -> String {
    let mut out = String::new();
    for theme in themes.iter() {
        out.push_str(&format!(
            "<link href=\"{}\" rel=\"stylesheet\" type=\"text/css\" />\n",
            theme.href.replace('"', "&quot;")
        ));
    }
    out.push_str("<style>\n");
    out.push_str(PREVIEW_OVERRIDE_CSS);
    out.push_str("\n</style>\n");
    out
}

/// Splice the head injection into a rendered document.
pub fn inject_head(document: &str, injection: &str) -> Result<String, AppError> {
    insert_before_marker(document, SPLICE_MARKER, injection)
}
