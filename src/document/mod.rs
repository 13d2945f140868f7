use crate::sanitize::SanitizedFragment;
use crate::wire::Language;

pub const DEFAULT_TITLE: &str = "Modern UI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    pub use_utility_css: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self { use_utility_css: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalDocument {
    pub code: String,
    pub language: Language,
}

fn tailwind_bootstrap() -> &'static str {
r#"
    <!-- Tailwind CSS -->
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {
            darkMode: 'class',
            theme: {
                extend: {
                    colors: {
                        primary: {
                            50: '#f0f9ff', 100: '#e0f2fe', 200: '#bae6fd', 300: '#7dd3fc', 400: '#38bdf8',
                            500: '#0ea5e9', 600: '#0284c7', 700: '#0369a1', 800: '#075985', 900: '#0c4a6e'
                        },
                        accent: {
                            50: '#fdf4ff', 100: '#fae8ff', 200: '#f5d0fe', 300: '#f0abfc', 400: '#e879f9',
                            500: '#d946ef', 600: '#c026d3', 700: '#a21caf', 800: '#86198f', 900: '#701a75'
                        },
                        success: {
                            50: '#ecfdf5', 100: '#d1fae5', 200: '#a7f3d0', 300: '#6ee7b7', 400: '#34d399',
                            500: '#10b981', 600: '#059669', 700: '#047857', 800: '#065f46', 900: '#064e3b'
                        }
                    },
                    backgroundImage: {
                        'gradient-primary': 'linear-gradient(to right, var(--tw-gradient-stops))',
                        'gradient-accent': 'linear-gradient(135deg, var(--tw-gradient-stops))',
                        'gradient-radial': 'radial-gradient(var(--tw-gradient-stops))'
                    },
                    backdropBlur: { 'xs': '2px' },
                    transitionDuration: { '2000': '2000ms' }
                }
            }
        }
    </script>
"#
}

fn icon_stylesheet() -> &'static str {
    r#"    <!-- Font Awesome -->
    <link href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css" rel="stylesheet">"#
}

fn base_styles() -> &'static str {
r#"        /* Glass morphism effect */
        .glass {
            background: rgba(255, 255, 255, 0.1);
            backdrop-filter: blur(10px);
            -webkit-backdrop-filter: blur(10px);
            border: 1px solid rgba(255, 255, 255, 0.1);
        }

        .dark .glass {
            background: rgba(17, 25, 40, 0.75);
            border: 1px solid rgba(255, 255, 255, 0.125);
        }

        /* Gradient animations */
        .gradient-animate {
            background-size: 200% 200%;
            animation: gradient 15s ease infinite;
        }

        @keyframes gradient {
            0% { background-position: 0% 50%; }
            50% { background-position: 100% 50%; }
            100% { background-position: 0% 50%; }
        }

        /* Modern card hover effects */
        .hover-lift {
            transition: transform 0.2s ease-in-out, box-shadow 0.2s ease-in-out;
        }

        .hover-lift:hover {
            transform: translateY(-5px);
            box-shadow: 0 10px 20px rgba(0, 0, 0, 0.1);
        }"#
}

/// Text lifted from the model's markup is already HTML source; decode it
/// once so existing entities are not encoded a second time.
fn head_text(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

/// Hoisted scripts first, in document order, then the fenced JavaScript.
pub fn combine_scripts(inline: &[String], explicit: &str) -> String {
    inline
        .iter()
        .map(|s| s.as_str())
        .chain(std::iter::once(explicit))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn synthesize(fragment: &SanitizedFragment, css: &str, explicit_js: &str, opts: &DocumentOptions) -> FinalDocument {
    let title = head_text(fragment.title.as_deref().unwrap_or(DEFAULT_TITLE));
    let title = html_escape::encode_text(&title);
    let description = head_text(fragment.description.as_deref().unwrap_or(""));
    let description = html_escape::encode_double_quoted_attribute(&description);
    let bootstrap = if opts.use_utility_css { tailwind_bootstrap() } else { "\n" };
    let custom_css = if css.trim().is_empty() {
        String::new()
    } else {
        format!("\n\n        /* Custom styles */\n{}", css.trim())
    };
    let js = combine_scripts(&fragment.inline_scripts, explicit_js);

    let code = format!(
r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="{description}">
{bootstrap}
{icons}

    <!-- Custom Styles -->
    <style>
{base}{custom_css}
    </style>
</head>
<body class="antialiased">
{body}

<script>
{js}
</script>
</body>
</html>
"#,
        icons = icon_stylesheet(),
        base = base_styles(),
        body = fragment.body_html,
    );

    FinalDocument { code, language: Language::Html }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn combine_orders_inline_before_explicit_and_drops_empty() {
        let inline = vec!["a()".to_string(), "  ".to_string(), "b()".to_string()];
        assert_eq!(combine_scripts(&inline, "console.log('x')"), "a()\n\nb()\n\nconsole.log('x')");
        assert_eq!(combine_scripts(&[], "  "), "");
        assert_eq!(combine_scripts(&[], "only()"), "only()");
    }

    #[test]
    fn empty_input_still_produces_a_skeleton() {
        let doc = synthesize(&SanitizedFragment::default(), "", "", &DocumentOptions::default());
        assert_eq!(doc.language, Language::Html);
        assert!(doc.code.starts_with("<!DOCTYPE html>"));
        assert!(doc.code.contains("<title>Modern UI</title>"));
        assert!(doc.code.contains("<meta name=\"description\" content=\"\">"));
        assert!(doc.code.contains("<body class=\"antialiased\">"));
        assert!(doc.code.contains("<script>\n\n</script>"));
        assert!(doc.code.trim_end().ends_with("</html>"));
    }

    #[test]
    fn utility_css_bootstrap_is_optional() {
        let frag = SanitizedFragment::default();
        let with = synthesize(&frag, "", "", &DocumentOptions { use_utility_css: true });
        let without = synthesize(&frag, "", "", &DocumentOptions { use_utility_css: false });
        assert!(with.code.contains("cdn.tailwindcss.com"));
        assert!(!without.code.contains("cdn.tailwindcss.com"));
        assert!(without.code.contains("font-awesome"));
        assert!(without.code.contains(".hover-lift"));
    }

    #[test]
    fn places_fragment_css_and_metadata() {
        let frag = SanitizedFragment {
            body_html: "<nav>Menu</nav>".into(),
            inline_scripts: vec!["init()".into()],
            title: Some("Shop & Co".into()),
            description: Some("Best \"shop\"".into()),
        };
        let doc = synthesize(&frag, ".nav { color: red; }", "run()", &DocumentOptions::default());
        assert!(doc.code.contains("<title>Shop &amp; Co</title>"));
        assert!(doc.code.contains("content=\"Best &quot;shop&quot;\""));
        assert!(doc.code.contains("/* Custom styles */\n.nav { color: red; }\n    </style>"));
        assert!(doc.code.contains("<body class=\"antialiased\">\n<nav>Menu</nav>\n"));
        assert!(doc.code.contains("<script>\ninit()\n\nrun()\n</script>\n</body>"));
    }

    #[test]
    fn lifted_entities_are_not_encoded_twice() {
        let frag = crate::sanitize::sanitize(
            "<head><title>Tom &amp; Jerry</title><meta name=\"description\" content=\"Fish &amp; Chips\"></head><p>x</p>",
            &crate::sanitize::Placeholders::default(),
        );
        let doc = synthesize(&frag, "", "", &DocumentOptions::default());
        assert!(doc.code.contains("<title>Tom &amp; Jerry</title>"));
        assert!(doc.code.contains("content=\"Fish &amp; Chips\""));
        assert!(!doc.code.contains("&amp;amp;"));
    }

    #[test]
    fn raw_markup_in_metadata_is_escaped() {
        let frag = SanitizedFragment {
            title: Some("<b>Bold</b>".into()),
            description: Some("say &quot;hi&quot;".into()),
            ..SanitizedFragment::default()
        };
        let doc = synthesize(&frag, "", "", &DocumentOptions::default());
        assert!(doc.code.contains("<title>&lt;b&gt;Bold&lt;/b&gt;</title>"));
        assert!(doc.code.contains("content=\"say &quot;hi&quot;\""));
    }
}
