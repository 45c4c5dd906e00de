//! Asset Linker — makes sure generated markup loads the stylesheet and script
//! that ship next to it in the archive.

use crate::models::site::{CSS_FILE, JS_FILE};

const HEAD_CLOSE: &str = "</head>";

/// Adds `<link>` / `<script>` references for non-empty assets the markup does not
/// already mention. References go right before the first `</head>`, or at the very
/// start of the document when there is no head.
pub fn link_assets(html: &str, has_css: bool, has_js: bool) -> String {
    let mut additions = Vec::new();
    if has_css && !html.contains(CSS_FILE) {
        additions.push(format!(r#"<link rel="stylesheet" href="{CSS_FILE}">"#));
    }
    if has_js && !html.contains(JS_FILE) {
        additions.push(format!(r#"<script defer src="{JS_FILE}"></script>"#));
    }

    if additions.is_empty() {
        return html.to_string();
    }

    let inject = format!("{}\n", additions.join("\n"));
    match html.find(HEAD_CLOSE) {
        Some(pos) => {
            let mut linked = String::with_capacity(html.len() + inject.len());
            linked.push_str(&html[..pos]);
            linked.push_str(&inject);
            linked.push_str(&html[pos..]);
            linked
        }
        None => inject + html,
    }
}
