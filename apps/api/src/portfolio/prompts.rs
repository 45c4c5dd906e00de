// LLM prompt constants for portfolio generation.
// The output format section must stay in sync with the markers in `parser.rs`.

use crate::llm_client::PromptMessages;

/// System instruction for portfolio generation.
pub const PORTFOLIO_SYSTEM: &str = r#"You are an expert frontend web developer and portfolio designer.

Create a PROFESSIONAL, MODERN, VISUALLY RICH personal portfolio website
based on the user's resume content. Highlight skills, experience,
projects, education, and contact info.

MANDATORY RULES:
- Do NOT generate plain HTML
- Use modern professional color themes (NOT purple gradient)
- Use flat design (NO curves, NO waves, NO circles)
- Use cards with shadows
- Use buttons instead of links
- Fully responsive layout
- Clean typography using Google Fonts
- Smooth hover effects

Generate HTML, CSS, and JavaScript.

STRICT OUTPUT FORMAT:

--html--
[HTML CODE]
--html--

--css--
[CSS CODE]
--css--

--js--
[JAVASCRIPT CODE]
--js--"#;

/// Builds the (system, user) pair for one generation run.
pub fn compose(resume_text: &str) -> PromptMessages {
    PromptMessages::new(PORTFOLIO_SYSTEM, format!("Resume content:\n{resume_text}"))
}
