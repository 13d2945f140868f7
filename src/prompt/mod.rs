use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::classify::Intent;
use crate::wire::HistoryEntry;

/// Most recent history entries considered for similarity context.
pub const SIMILAR_CANDIDATES: usize = 5;
/// An entry must share strictly more tokens than this with the prompt.
pub const MIN_SHARED_TOKENS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    Detailed,
    Concise,
}

impl Default for TemplateStyle {
    fn default() -> Self {
        TemplateStyle::Detailed
    }
}

fn landing_elements() -> &'static str {
r#"1. **Design Elements**:
   - A visually appealing hero section with a clear headline and a call-to-action (CTA) button.
   - A feature grid with hover effects and icons.
   - A social proof section with testimonials or client logos.
   - (Optional) Pricing tables for comparison if applicable.
   - A statistics/achievements section to highlight key metrics.
   - (Optional) A team section with hover cards for each team member.
   - A contact form with modern validation and accessibility features.
   - A footer with quick links, social media icons, and a copyright notice."#
}

fn component_elements() -> &'static str {
r#"1. **Component Behaviour**:
   - A single, self-contained UI component focused on the request below.
   - Clear interactive states: default, hover, focus, active and disabled.
   - A loading state (spinner or skeleton) wherever content may be asynchronous.
   - Inline validation with helpful error messages for any user input.
   - Subtle micro-interactions on hover and focus; respect `prefers-reduced-motion`."#
}

fn visual_effects() -> &'static str {
r#"2. **Visual Effects**:
   - Use modern design patterns such as gradient overlays, glassmorphism for cards, and subtle background patterns.
   - Include animated micro-interactions on hover and focus states.
   - Implement skeleton loading states for lazy loading content.
   - Add smooth scroll behavior for navigation and scrolling back to the top.
   - Ensure responsive typography and layout for mobile and desktop views."#
}

fn responsiveness() -> &'static str {
r#"3. **Responsiveness & Accessibility**:
   - Implement mobile-first design principles.
   - Ensure that all elements stack correctly on mobile devices with appropriate spacing.
   - Include a professional hamburger menu for mobile navigation when there is navigation.
   - Add touch-friendly elements with large touch targets.
   - Use semantic HTML, aria labels and visible focus outlines; keep colour contrast accessible."#
}

fn utility_css_features() -> &'static str {
r#"4. **Tailwind CSS Features**:
   - Utilize Tailwind's color palette and contrast utilities to maintain accessibility.
   - Add dark mode support (class strategy) and a toggle switch for users to change themes.
   - Leverage flexbox and grid layouts for responsive design.
   - Use Tailwind's spacing, transition, and transform utilities to enhance user experience."#
}

fn plain_css_features() -> &'static str {
r#"4. **CSS**:
   - Do NOT use Tailwind or any other CSS framework; write plain, well-organised CSS.
   - Use CSS custom properties for colours and spacing; support dark mode with `prefers-color-scheme`.
   - Use flexbox and grid for layout."#
}

fn javascript_functionality(landing: bool) -> &'static str {
    if landing {
r#"5. **JavaScript Functionality**:
   - Smooth scroll for in-page navigation (e.g., links to sections).
   - An accessible mobile menu toggle.
   - An accessible dark mode toggle with persistent state (saved in localStorage).
   - Intersection Observer for lazy loading images and animations.
   - Form validation for the contact form.
   - Scroll-to-top button functionality."#
    } else {
r#"5. **JavaScript Functionality**:
   - Wire up every interactive state described above with vanilla JavaScript.
   - Validate user input before submission and announce errors to assistive technology.
   - Keep all behaviour in the javascript section; attach listeners after DOMContentLoaded."#
    }
}

fn technology_constraints(use_utility_css: bool) -> String {
    let styling = if use_utility_css {
        "Style with Tailwind CSS utility classes (the Tailwind CDN is loaded for you)."
    } else {
        "Style with plain CSS only; no CSS framework is available."
    };
    format!(
"Technology constraints:
- Vanilla HTML, CSS and JavaScript only. No React, Vue, Angular, Svelte, JSX, TSX or any framework syntax.
- {styling}
- Font Awesome 6 icons are available via `fa-` classes.
- Images MUST use deterministic placeholders from https://picsum.photos/<width>/<height> (e.g. https://picsum.photos/800/600). Never reference other image hosts.
- Return a fragment for the <body>; do not include <!DOCTYPE>, <html>, <head> or <body> tags."
    )
}

fn output_format() -> &'static str {
r#"Return the code in exactly three fenced sections, in this order, and nothing else:

```html
<!-- Body markup only. Include data attributes for JavaScript functionality. -->
```

```css
/* Only include custom CSS if absolutely necessary */
```

```javascript
// All JavaScript for the page
```"#
}

fn concise_requirements(landing: bool) -> &'static str {
    if landing {
r#"Requirements:
- Sections: hero with CTA, feature grid, testimonials, pricing, statistics, team, contact form, footer.
- Mobile-first, responsive, accessible; dark mode toggle; smooth scrolling."#
    } else {
r#"Requirements:
- Interactive states (hover, focus, active, disabled), a loading state, input validation and micro-interactions.
- Mobile-first, responsive and accessible."#
    }
}

/// Lowercase alphanumeric word tokens.
pub fn tokenize(s: &str) -> HashSet<String> {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

/// Pick the entries among the first `SIMILAR_CANDIDATES` (most recent first)
/// that share more than `MIN_SHARED_TOKENS` distinct words with `prompt`.
pub fn select_similar(prompt: &str, recent: &[HistoryEntry]) -> Vec<HistoryEntry> {
    let qtokens = tokenize(prompt);
    if qtokens.is_empty() {
        return Vec::new();
    }
    recent
        .iter()
        .take(SIMILAR_CANDIDATES)
        .filter(|e| tokenize(&e.prompt).intersection(&qtokens).count() > MIN_SHARED_TOKENS)
        .cloned()
        .collect()
}

fn similar_context(similar: &[HistoryEntry]) -> String {
    let mut s = String::from("Here are some similar previous prompts and their responses for reference:\n\n");
    for e in similar {
        s.push_str("Prompt: ");
        s.push_str(&e.prompt);
        s.push_str("\nResponse: ");
        s.push_str(&e.response);
        s.push_str("\n\n");
    }
    s.push_str("Now, please generate code for the following new prompt:\n\n");
    s
}

pub fn enhance(prompt: &str, intent: &Intent, similar: &[HistoryEntry], style: TemplateStyle) -> String {
    let context = if similar.is_empty() { String::new() } else { similar_context(similar) };
    let subject = if intent.is_landing_page { "landing page" } else { "component" };
    let framework = if intent.use_utility_css { "Tailwind CSS" } else { "plain CSS" };

    let body = match style {
        TemplateStyle::Detailed => format!(
"{elements}

{effects}

{responsive}

{css}

{js}",
            elements = if intent.is_landing_page { landing_elements() } else { component_elements() },
            effects = visual_effects(),
            responsive = responsiveness(),
            css = if intent.use_utility_css { utility_css_features() } else { plain_css_features() },
            js = javascript_functionality(intent.is_landing_page),
        ),
        TemplateStyle::Concise => concise_requirements(intent.is_landing_page).to_string(),
    };

    format!(
"{context}Create a modern and professional {subject} using {framework}. The design should include the following elements and features:

{body}

{constraints}

{output}

For the specific request: {prompt}",
        constraints = technology_constraints(intent.use_utility_css),
        output = output_format(),
    )
}
