use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static HEAD_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").expect("head pattern"));
static WRAPPER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:!DOCTYPE|html|head|body)\b[^>]*>").expect("wrapper pattern"));
static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").expect("script pattern"));
static SRC_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)src\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("src pattern"));
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("title pattern"));
static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+name\s*=\s*["']description["']\s+content\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("description pattern")
});

/// Stand-in image URLs, one per heuristic branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub avatar: String,
    pub hero: String,
    pub product: String,
    pub default: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            avatar: "https://picsum.photos/200".into(),
            hero: "https://picsum.photos/1920/1080".into(),
            product: "https://picsum.photos/400/300".into(),
            default: "https://picsum.photos/800/600".into(),
        }
    }
}

impl Placeholders {
    /// Precedence: avatar/profile, hero/banner, product/item, default.
    pub fn pick(&self, attr: &str) -> &str {
        let a = attr.to_lowercase();
        if a.contains("avatar") || a.contains("profile") {
            &self.avatar
        } else if a.contains("hero") || a.contains("banner") {
            &self.hero
        } else if a.contains("product") || a.contains("item") {
            &self.product
        } else {
            &self.default
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedFragment {
    pub body_html: String,
    pub inline_scripts: Vec<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub fn extract_title(html: &str) -> Option<String> {
    TITLE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

pub fn extract_description(html: &str) -> Option<String> {
    DESCRIPTION
        .captures(html)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().trim().to_string())
}

/// Drop `<head>` blocks and any stray document wrapper tags.
pub fn strip_wrappers(html: &str) -> String {
    let without_head = HEAD_BLOCK.replace_all(html, "");
    WRAPPER_TAG.replace_all(&without_head, "").into_owned()
}

/// Returns the fragment with every `<script>` removed, plus the non-empty
/// script bodies in document order.
pub fn hoist_scripts(html: &str) -> (String, Vec<String>) {
    let scripts = SCRIPT_BLOCK
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    (SCRIPT_BLOCK.replace_all(html, "").into_owned(), scripts)
}

/// Every `src` attribute is replaced; none is kept verbatim.
pub fn rewrite_images(html: &str, placeholders: &Placeholders) -> String {
    SRC_ATTR
        .replace_all(html, |c: &Captures<'_>| format!("src=\"{}\"", placeholders.pick(&c[0])))
        .into_owned()
}

pub fn sanitize(html: &str, placeholders: &Placeholders) -> SanitizedFragment {
    let title = extract_title(html);
    let description = extract_description(html);

    let stripped = strip_wrappers(html);
    let (without_scripts, inline_scripts) = hoist_scripts(&stripped);
    let body_html = rewrite_images(&without_scripts, placeholders).trim().to_string();

    SanitizedFragment { body_html, inline_scripts, title, description }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hoists_inline_script() {
        let f = sanitize("<div>hi</div><script>alert(1)</script>", &Placeholders::default());
        assert_eq!(f.inline_scripts, vec!["alert(1)".to_string()]);
        assert!(!f.body_html.to_lowercase().contains("<script"));
        assert_eq!(f.body_html, "<div>hi</div>");
    }

    #[test]
    fn scripts_keep_document_order_and_skip_empty_bodies() {
        let html = "<script>\n  first()\n</script><p>a</p><SCRIPT type=\"module\">second()</SCRIPT><script src=\"x.js\"></script>";
        let (body, scripts) = hoist_scripts(html);
        assert_eq!(scripts, vec!["first()".to_string(), "second()".to_string()]);
        assert_eq!(body, "<p>a</p>");
    }

    #[test]
    fn strips_document_wrappers_but_not_header() {
        let html = "<!DOCTYPE html>\n<html lang=\"en\"><head><title>T</title><style>x</style></head>\n<body class=\"x\"><header>Top</header><main>m</main></body></html>";
        let f = sanitize(html, &Placeholders::default());
        assert_eq!(f.body_html, "<header>Top</header><main>m</main>");
        assert_eq!(f.title.as_deref(), Some("T"));
    }

    #[test]
    fn scripts_inside_head_are_dropped_with_it() {
        let html = "<head><script>inHead()</script></head><script>inBody()</script>";
        let f = sanitize(html, &Placeholders::default());
        assert_eq!(f.inline_scripts, vec!["inBody()".to_string()]);
    }

    #[test]
    fn image_heuristic_branches() {
        let p = Placeholders::default();
        assert_eq!(p.pick(r#"src="avatar.png""#), "https://picsum.photos/200");
        assert_eq!(p.pick(r#"src="/img/Profile-1.jpg""#), "https://picsum.photos/200");
        assert_eq!(p.pick(r#"src="hero-banner.jpg""#), "https://picsum.photos/1920/1080");
        assert_eq!(p.pick(r#"src="BANNER.webp""#), "https://picsum.photos/1920/1080");
        assert_eq!(p.pick(r#"src="product-3.png""#), "https://picsum.photos/400/300");
        assert_eq!(p.pick(r#"src="random.jpg""#), "https://picsum.photos/800/600");
        // avatar beats hero, hero beats product
        assert_eq!(p.pick(r#"src="hero-avatar.png""#), "https://picsum.photos/200");
        assert_eq!(p.pick(r#"src="hero-product.png""#), "https://picsum.photos/1920/1080");
    }

    #[test]
    fn rewrites_every_src_including_valid_urls() {
        let html = r#"<img src="https://picsum.photos/800/600" alt="a"><img src='https://cdn.example.com/avatar.jpg'><img SRC = "team/profile.png">"#;
        let out = rewrite_images(html, &Placeholders::default());
        assert_eq!(
            out,
            r#"<img src="https://picsum.photos/800/600" alt="a"><img src="https://picsum.photos/200"><img src="https://picsum.photos/200">"#
        );
    }

    #[test]
    fn title_and_description_default_to_none() {
        let f = sanitize("<div></div>", &Placeholders::default());
        assert_eq!(f.title, None);
        assert_eq!(f.description, None);
    }

    #[test]
    fn reads_description_with_either_quote_style() {
        assert_eq!(
            extract_description(r#"<meta name="description" content="A shop">"#).as_deref(),
            Some("A shop")
        );
        assert_eq!(
            extract_description("<meta name='description' content='Single'/>").as_deref(),
            Some("Single")
        );
    }

    #[test]
    fn tolerates_garbage() {
        let f = sanitize("<script>unterminated <head> <<<>>> src=", &Placeholders::default());
        assert!(f.inline_scripts.is_empty());
        assert_eq!(f.title, None);
    }
}
