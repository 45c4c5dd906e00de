//! Output Parser — turns the model's free-form reply into `SiteAssets`.
//!
//! Three tiers, tried in order, first hit wins:
//! 1. explicit `--html--` / `--css--` / `--js--` markers (all three required)
//! 2. language-tagged fenced code blocks
//! 3. the whole trimmed reply as markup
//!
//! Never fails: malformed input degrades to tier 3.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::site::{ParseTier, SiteAssets};

pub const HTML_MARKER: &str = "--html--";
pub const CSS_MARKER: &str = "--css--";
pub const JS_MARKER: &str = "--js--";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```(html|css|javascript|js)\s+([\s\S]*?)```")
        .expect("fence regex is valid")
});

/// Parses a raw model reply, reporting which tier produced the result.
pub fn parse_output(raw: &str) -> (SiteAssets, ParseTier) {
    parse_markers(raw)
        .map(|assets| (assets, ParseTier::Markers))
        .or_else(|| parse_fenced(raw).map(|assets| (assets, ParseTier::Fenced)))
        .unwrap_or_else(|| (parse_fallback(raw), ParseTier::Fallback))
}

/// Tier 1. Applies only when all three markers occur somewhere in the text.
pub fn parse_markers(text: &str) -> Option<SiteAssets> {
    if ![HTML_MARKER, CSS_MARKER, JS_MARKER]
        .iter()
        .all(|marker| text.contains(marker))
    {
        return None;
    }

    Some(SiteAssets::new(
        between_markers(text, HTML_MARKER),
        between_markers(text, CSS_MARKER),
        between_markers(text, JS_MARKER),
    ))
}

/// Text between the first and second occurrence of `marker`, or to the end of
/// `text` when the marker only appears once.
fn between_markers<'a>(text: &'a str, marker: &str) -> &'a str {
    let mut pieces = text.split(marker);
    pieces.next();
    pieces.next().unwrap_or_default().trim()
}

/// Tier 2. Later blocks with the same label replace earlier ones.
/// `javascript` takes precedence over `js` when both are present.
pub fn parse_fenced(text: &str) -> Option<SiteAssets> {
    let mut html = None;
    let mut css = None;
    let mut javascript = None;
    let mut js = None;

    for caps in FENCE_RE.captures_iter(text) {
        let body = caps[2].trim().to_string();
        match caps[1].to_ascii_lowercase().as_str() {
            "html" => html = Some(body),
            "css" => css = Some(body),
            "javascript" => javascript = Some(body),
            "js" => js = Some(body),
            _ => {}
        }
    }

    let assets = SiteAssets::new(
        html.unwrap_or_default(),
        css.unwrap_or_default(),
        javascript.or(js).unwrap_or_default(),
    );

    assets.has_content().then_some(assets)
}

/// Tier 3.
pub fn parse_fallback(text: &str) -> SiteAssets {
    SiteAssets::new(text.trim(), "", "")
}
