use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";

static HTML_BLOCK: Lazy<Regex> = Lazy::new(|| fenced("html"));
static CSS_BLOCK: Lazy<Regex> = Lazy::new(|| fenced("css"));
static JS_BLOCK: Lazy<Regex> = Lazy::new(|| fenced("javascript"));

/// Opening fence must carry exactly `tag` (trailing blanks allowed) and end the line.
/// The body is captured non-greedily up to the next fence.
fn fenced(tag: &str) -> Regex {
    Regex::new(&format!(r"(?s)```(?i:{tag})[ \t]*\r?\n(.*?)```")).expect("static fence pattern")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSections {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl ExtractedSections {
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.css.is_empty() && self.js.is_empty()
    }
}

fn first_block(re: &Regex, raw: &str) -> String {
    re.captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Only the first block of each tag is captured; later blocks with the
/// same tag are ignored.
pub fn extract(raw: &str, bare_document_fallback: bool) -> ExtractedSections {
    if bare_document_fallback && is_bare_document(raw) {
        return ExtractedSections {
            html: raw.trim().to_string(),
            ..Default::default()
        };
    }
    ExtractedSections {
        html: first_block(&HTML_BLOCK, raw),
        css: first_block(&CSS_BLOCK, raw),
        js: first_block(&JS_BLOCK, raw),
    }
}

/// A response with no fences at all that still looks like a full document.
pub fn is_bare_document(raw: &str) -> bool {
    !raw.contains(FENCE) && raw.to_lowercase().contains("<!doctype html")
}
