use serde::{Deserialize, Serialize};

pub const NOT_CODE_REQUEST_MESSAGE: &str = "I am trained to create responsive and beautiful UI components. Please ask me to design or create something specific.";

pub const FRAMEWORK_SPECIFIC_MESSAGE: &str = "I only generate vanilla HTML, CSS, and JavaScript code. Framework-specific code (React, Vue, Angular, etc.) is not supported. Please rephrase your request to use vanilla web technologies.";

const NARROW_CODE_KEYWORDS: &[&str] = &[
    "create", "generate", "write", "design", "build", "layout",
    "interface", "ui", "page", "landing", "website", "component",
];

const BROAD_EXTRA_KEYWORDS: &[&str] = &[
    "make", "implement", "develop", "button", "section", "style",
    "animation", "effect", "hover", "transition", "html", "css",
    "javascript", "tailwind", "responsive", "code", "script", "program",
    "form", "navbar", "navigation", "menu", "card", "header", "footer",
    "hero", "modal",
];

const FRAMEWORK_KEYWORDS: &[&str] = &[
    "react", "vue", "angular", "svelte", "next.js", "nuxt", "component",
    "jsx", "tsx", "props", "state", "hooks", "useeffect", "usestate",
];

const LANDING_KEYWORDS: &[&str] = &["landing", "homepage", "main page", "website"];

const UTILITY_CSS_OPT_OUT: &[&str] = &[
    "no tailwind", "without tailwind", "plain css", "vanilla css", "pure css",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordPreset {
    Narrow,
    Broad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotCodeRequest,
    FrameworkSpecific,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::NotCodeRequest => NOT_CODE_REQUEST_MESSAGE,
            RejectReason::FrameworkSpecific => FRAMEWORK_SPECIFIC_MESSAGE,
        }
    }
}

/// What an accepted request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub is_landing_page: bool,
    pub use_utility_css: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Rejected(RejectReason),
    Accepted(Intent),
}

/// Keyword sets driving the classifier. All matching is lowercase substring.
#[derive(Debug, Clone)]
pub struct KeywordPolicy {
    pub code_keywords: Vec<String>,
    pub framework_keywords: Vec<String>,
    pub landing_keywords: Vec<String>,
    pub utility_css_opt_out: Vec<String>,
    pub utility_css: bool,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl KeywordPolicy {
    pub fn narrow() -> Self {
        Self::from_preset(KeywordPreset::Narrow)
    }

    pub fn broad() -> Self {
        Self::from_preset(KeywordPreset::Broad)
    }

    pub fn from_preset(preset: KeywordPreset) -> Self {
        let mut code_keywords = owned(NARROW_CODE_KEYWORDS);
        if preset == KeywordPreset::Broad {
            code_keywords.extend(owned(BROAD_EXTRA_KEYWORDS));
        }
        Self {
            code_keywords,
            framework_keywords: owned(FRAMEWORK_KEYWORDS),
            landing_keywords: owned(LANDING_KEYWORDS),
            utility_css_opt_out: owned(UTILITY_CSS_OPT_OUT),
            utility_css: true,
        }
    }
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self::broad()
    }
}

fn matches_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| haystack.contains(&k.to_lowercase()))
}

/// Code intent is checked before framework intent; a prompt with no code
/// intent is never reported as framework-specific.
pub fn classify(prompt: &str, policy: &KeywordPolicy) -> Classification {
    let p = prompt.to_lowercase();
    if !matches_any(&p, &policy.code_keywords) {
        return Classification::Rejected(RejectReason::NotCodeRequest);
    }
    if matches_any(&p, &policy.framework_keywords) {
        return Classification::Rejected(RejectReason::FrameworkSpecific);
    }
    Classification::Accepted(Intent {
        is_landing_page: matches_any(&p, &policy.landing_keywords),
        use_utility_css: policy.utility_css && !matches_any(&p, &policy.utility_css_opt_out),
    })
}
