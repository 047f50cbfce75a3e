//! Google Gemini adapter (`generateContent` REST endpoint).
//!
//! Gemini tends to wrap its JSON in markdown fences; the shared sanitizer strips them.

use super::outreach_json::{outreach_prompt, parse_outreach};
use crate::domain::{DomainError, OutreachDraft, PlaceDetail};
use crate::ports::AiPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    /// # Arguments
    /// * `base_url` - e.g. "https://generativelanguage.googleapis.com"
    /// * `model` - e.g. "gemini-1.5-flash"
    pub fn new(client: reqwest::Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[async_trait::async_trait]
impl AiPort for GeminiAdapter {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    async fn draft_outreach(&self, detail: &PlaceDetail) -> Result<OutreachDraft, DomainError> {
        info!(business = %detail.name, model = %self.model, "requesting outreach from Gemini");

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: outreach_prompt(detail),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Gemini API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let raw_text = body
            .text()
            .ok_or_else(|| DomainError::Ai("No candidates returned".to_string()))?;

        debug!(raw_len = raw_text.len(), "received Gemini response");
        parse_outreach(&raw_text)
    }
}
