//! Outreach content with provider fallback.
//!
//! Providers are tried in order; the first success wins. When every provider
//! fails, the static template answers. `generate` never returns an error.

use crate::domain::templates::{STATIC_PROVIDER, static_outreach};
use crate::domain::{ContentTier, GeneratedContent, PlaceDetail};
use crate::ports::AiPort;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ContentGenerator {
    tiers: Vec<Arc<dyn AiPort>>,
}

impl ContentGenerator {
    /// # Arguments
    /// * `tiers` - AI providers in fallback order (primary first)
    pub fn new(tiers: Vec<Arc<dyn AiPort>>) -> Self {
        Self { tiers }
    }

    /// Generator with no AI providers: every call uses the static template.
    pub fn static_only() -> Self {
        Self::new(Vec::new())
    }

    /// Provider labels in fallback order, static template last.
    pub fn chain(&self) -> Vec<&'static str> {
        self.tiers
            .iter()
            .map(|t| t.provider())
            .chain(std::iter::once(STATIC_PROVIDER))
            .collect()
    }

    pub async fn generate(&self, detail: &PlaceDetail) -> GeneratedContent {
        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.draft_outreach(detail).await {
                Ok(draft) => {
                    info!(
                        provider = tier.provider(),
                        business = %detail.name,
                        "outreach content generated"
                    );
                    return GeneratedContent::from_draft(
                        draft,
                        detail,
                        ContentTier::for_position(index),
                        tier.provider(),
                    );
                }
                Err(e) => {
                    warn!(
                        provider = tier.provider(),
                        business = %detail.name,
                        error = %e,
                        "content provider failed, falling through"
                    );
                }
            }
        }

        info!(business = %detail.name, "using static outreach template");
        GeneratedContent::from_draft(
            static_outreach(detail),
            detail,
            ContentTier::Static,
            STATIC_PROVIDER,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiAdapter;

    fn detail(website: Option<&str>) -> PlaceDetail {
        PlaceDetail {
            name: "Gourmet Gardens Bistro".to_string(),
            formatted_phone_number: Some("(555) 123-4567".to_string()),
            website: website.map(str::to_string),
            types: vec!["restaurant".to_string()],
            vicinity: Some("123 Culinary Way".to_string()),
        }
    }

    #[tokio::test]
    async fn test_all_providers_failing_falls_back_to_static() {
        let generator = ContentGenerator::new(vec![
            Arc::new(MockAiAdapter::failing("gemini")),
            Arc::new(MockAiAdapter::failing("openai")),
        ]);

        for website in [None, Some("https://gardens.example")] {
            let input = detail(website);
            let content = generator.generate(&input).await;
            assert_eq!(content.tier, ContentTier::Static);
            assert_eq!(content.provider, STATIC_PROVIDER);
            assert!(!content.email.is_empty());
            assert!(!content.antigravity_prompt.is_empty());
            assert!(!content.description.is_empty());
            assert_eq!(content.has_website, input.website.is_some());
        }
    }

    #[tokio::test]
    async fn test_fenced_primary_response_is_used() {
        let fenced = "```json\n{\"email\":\"Hello\",\"antigravityPrompt\":\"Build it\",\"description\":\"A bistro\"}\n```";
        let secondary = Arc::new(MockAiAdapter::replying("openai", "{}"));
        let generator = ContentGenerator::new(vec![
            Arc::new(MockAiAdapter::replying("gemini", fenced)),
            secondary.clone() as Arc<dyn AiPort>,
        ]);

        let content = generator.generate(&detail(None)).await;
        assert_eq!(content.tier, ContentTier::Primary);
        assert_eq!(content.provider, "gemini");
        assert_eq!(content.email, "Hello");
        assert_eq!(content.antigravity_prompt, "Build it");
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_primary_falls_through_to_secondary() {
        let generator = ContentGenerator::new(vec![
            Arc::new(MockAiAdapter::replying("gemini", "not json at all")),
            Arc::new(MockAiAdapter::replying(
                "openai",
                r#"{"email":"From OpenAI","antigravityPrompt":"P"}"#,
            )),
        ]);

        let content = generator.generate(&detail(Some("https://gardens.example"))).await;
        assert_eq!(content.tier, ContentTier::Secondary);
        assert_eq!(content.email, "From OpenAI");
        assert_eq!(content.description, "Description unavailable.");
        assert!(content.has_website);
    }

    #[tokio::test]
    async fn test_static_only_chain() {
        let generator = ContentGenerator::static_only();
        assert_eq!(generator.chain(), vec![STATIC_PROVIDER]);
        let content = generator.generate(&detail(None)).await;
        assert_eq!(content.tier, ContentTier::Static);
        assert!(content.email.starts_with("Subject: Digital Transformation"));
    }
}
