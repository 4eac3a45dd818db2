//! Writing guideline lookup
//!
//! Structure, style and checklist recommendations per content type.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct StyleGuide {
    pub tone: &'static str,
    pub sentence_length: &'static str,
    pub code_snippets: &'static str,
    pub headings: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Guidelines {
    pub structure: &'static [&'static str],
    pub style: StyleGuide,
    pub checklist: &'static [&'static str],
}

pub static CONTENT_TYPES: &[(&str, Guidelines)] = &[
    (
        "technical_blog",
        Guidelines {
            structure: &[
                "1. Engaging title",
                "2. Brief introduction (the 'why')",
                "3. Main content with clear sections",
                "4. Code examples with explanations",
                "5. Common pitfalls or gotchas",
                "6. Conclusion and key takeaways",
            ],
            style: StyleGuide {
                tone: "Professional yet conversational",
                sentence_length: "Mix short and medium sentences",
                code_snippets: "Always include context and output",
                headings: "Use descriptive, scannable headings",
            },
            checklist: &[
                "Clear target audience?",
                "Code tested and functional?",
                "Jargon explained?",
                "Logical flow?",
                "Actionable takeaways?",
            ],
        },
    ),
    (
        "tutorial",
        Guidelines {
            structure: &[
                "1. What you'll build",
                "2. Prerequisites",
                "3. Step-by-step instructions",
                "4. Testing/verification",
                "5. Next steps or extensions",
            ],
            style: StyleGuide {
                tone: "Patient and encouraging",
                sentence_length: "Short, clear instructions",
                code_snippets: "Complete, runnable code",
                headings: "Action-oriented (e.g., 'Install Dependencies')",
            },
            checklist: &[
                "Prerequisites clearly stated?",
                "Every step tested?",
                "Screenshots or examples?",
                "Troubleshooting section?",
                "Working final result?",
            ],
        },
    ),
    (
        "documentation",
        Guidelines {
            structure: &[
                "1. Overview/purpose",
                "2. API/function reference",
                "3. Parameters and return values",
                "4. Usage examples",
                "5. Error handling",
            ],
            style: StyleGuide {
                tone: "Formal and precise",
                sentence_length: "Concise and direct",
                code_snippets: "Minimal, focused examples",
                headings: "Standardized format",
            },
            checklist: &[
                "All parameters documented?",
                "Types specified?",
                "Edge cases covered?",
                "Examples runnable?",
                "Version information included?",
            ],
        },
    ),
    (
        "email",
        Guidelines {
            structure: &[
                "1. Clear subject line",
                "2. Greeting",
                "3. Context (1-2 sentences)",
                "4. Main message",
                "5. Call to action",
                "6. Professional sign-off",
            ],
            style: StyleGuide {
                tone: "Professional and respectful",
                sentence_length: "Short paragraphs",
                code_snippets: "Link to docs instead",
                headings: "Use bullet points for lists",
            },
            checklist: &[
                "Subject line descriptive?",
                "Purpose clear upfront?",
                "Proofread for errors?",
                "Next steps obvious?",
                "Appropriate tone?",
            ],
        },
    ),
];

pub fn available_types() -> Vec<&'static str> {
    CONTENT_TYPES.iter().map(|(name, _)| *name).collect()
}

/// Guidelines for a content type (exact name match)
pub fn get_writing_guidelines(content_type: &str) -> Value {
    match CONTENT_TYPES.iter().find(|(name, _)| *name == content_type) {
        Some((_, guidelines)) => json!({
            "success": true,
            "content_type": content_type,
            "guidelines": guidelines,
        }),
        None => json!({
            "success": false,
            "error": format!("Content type '{}' not recognized.", content_type),
            "available_types": available_types(),
        }),
    }
}
