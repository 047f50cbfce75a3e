//! Prompt and response handling shared by every AI provider.
//!
//! All providers receive the same prompt and must answer with a JSON object
//! holding `email`, `antigravityPrompt` and `description`.

use crate::domain::{DomainError, OutreachDraft, PlaceDetail};
use serde::Deserialize;

/// Used when a provider answers without a description.
pub const DESCRIPTION_UNAVAILABLE: &str = "Description unavailable.";

const FENCE: &str = "```";

/// Build the outreach prompt for one business.
pub fn outreach_prompt(detail: &PlaceDetail) -> String {
    let name = detail.name.as_str();
    let category = detail.category_label();
    let vicinity = detail.vicinity_or_empty();
    let has_website = match detail.website() {
        Some(url) => format!("Yes ({url})"),
        None => "No".to_string(),
    };

    format!(
        r#"Business Name: {name}
Category: {category}
Location: {vicinity}
Has Website: {has_website}

1. Draft a professional outreach email.
   If NO website: Focus on 'Digital Transformation and Building a New Site'.
   If HAS website: Focus on 'Conversion Optimization and SEO'.

2. Generate a highly detailed 'Antigravity Prompt' for an AI website builder.
   This prompt MUST describe:
   - Business Category: Clearly define {category}.
   - Local Vibe: Describe a "modern local business with a community-focused, active vibe" for {vicinity}.
   - Essential Sections: Specify Hero (with strong CTA), Services (listing {category} offerings), and Contact (with form).
   - Formatting: Use a clear, descriptive tone optimized for an AI that builds websites.

3. Generate a 150-200 word 'description' summarizing the presumed nature of the business, facility, or institution based on its name and category.

Format the response strictly as a JSON object with keys: "email", "antigravityPrompt", and "description". Do not include markdown formatting like {FENCE}json."#
    )
}

/// Sanitize JSON response from LLM.
///
/// LLMs sometimes wrap JSON in markdown code blocks. This strips them.
pub fn sanitize_json(raw_text: &str) -> String {
    let trimmed = raw_text.trim();

    // Handle markdown code blocks: ```json ... ``` or ``` ... ```
    if let Some(rest) = trimmed.strip_prefix(FENCE) {
        let without_prefix = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end_idx) = without_prefix.rfind(FENCE) {
            return without_prefix[..end_idx].trim().to_string();
        }
        return without_prefix.trim().to_string();
    }

    // JSON surrounded by prose
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if start < end {
                return trimmed[start..=end].to_string();
            }
        }
    }

    trimmed.to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmOutreach {
    email: Option<String>,
    antigravity_prompt: Option<String>,
    description: Option<String>,
}

/// Parse a provider's raw text into a draft.
///
/// Fails when the text is not JSON or lacks the email or the prompt; the caller
/// treats that as a provider failure.
pub fn parse_outreach(raw_text: &str) -> Result<OutreachDraft, DomainError> {
    let clean = sanitize_json(raw_text);
    let parsed: LlmOutreach = serde_json::from_str(&clean).map_err(|e| {
        DomainError::Ai(format!(
            "Failed to parse LLM JSON: {} (got: {})",
            e,
            clean.chars().take(120).collect::<String>()
        ))
    })?;

    let email = required(parsed.email, "email")?;
    let antigravity_prompt = required(parsed.antigravity_prompt, "antigravityPrompt")?;
    let description = parsed
        .description
        .map(|d| strip_fences(&d))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string());

    Ok(OutreachDraft {
        email,
        antigravity_prompt,
        description,
    })
}

fn required(value: Option<String>, key: &str) -> Result<String, DomainError> {
    value
        .map(|v| strip_fences(&v))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::Ai(format!("LLM response is missing \"{}\"", key)))
}

/// Remove stray fence markers left inside a field.
fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace(FENCE, "").trim().to_string()
}
