/// Conventional file names inside the generated archive.
pub const HTML_FILE: &str = "index.html";
pub const CSS_FILE: &str = "style.css";
pub const JS_FILE: &str = "script.js";

/// The three text assets of a generated portfolio site. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteAssets {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl SiteAssets {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    /// True when at least one section carries content.
    pub fn has_content(&self) -> bool {
        !(self.html.is_empty() && self.css.is_empty() && self.js.is_empty())
    }

    pub fn has_css(&self) -> bool {
        !self.css.trim().is_empty()
    }

    pub fn has_js(&self) -> bool {
        !self.js.trim().is_empty()
    }

    /// Archive entries in write order: (file name, contents).
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (HTML_FILE, self.html.as_str()),
            (CSS_FILE, self.css.as_str()),
            (JS_FILE, self.js.as_str()),
        ]
    }
}

/// Which parser tier produced a set of assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    /// `--html--` / `--css--` / `--js--` markers were all present.
    Markers,
    /// Language-tagged fenced code blocks.
    Fenced,
    /// Whole response taken as markup.
    Fallback,
}

impl ParseTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseTier::Markers => "markers",
            ParseTier::Fenced => "fenced",
            ParseTier::Fallback => "fallback",
        }
    }
}
