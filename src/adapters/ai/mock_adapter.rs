//! Mock AI adapter for testing without API calls.
//!
//! Returns canned outreach, a scripted raw reply, or a failure.

use super::outreach_json::parse_outreach;
use crate::domain::{DomainError, OutreachDraft, PlaceDetail};
use crate::ports::AiPort;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

enum Behavior {
    Canned,
    /// Raw provider text, run through the same parser as real providers.
    Reply(String),
    Fail,
}

/// Mock AI adapter for testing.
///
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    provider: &'static str,
    behavior: Behavior,
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockAiAdapter {
    /// Canned outreach with the default delay (100ms).
    pub fn new() -> Self {
        Self::build("mock", Behavior::Canned, 100)
    }

    /// Replies with `raw` verbatim; parsing decides success.
    pub fn replying(provider: &'static str, raw: impl Into<String>) -> Self {
        Self::build(provider, Behavior::Reply(raw.into()), 0)
    }

    /// Fails every call.
    pub fn failing(provider: &'static str) -> Self {
        Self::build(provider, Behavior::Fail, 0)
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Number of `draft_outreach` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn build(provider: &'static str, behavior: Behavior, delay_ms: u64) -> Self {
        Self {
            provider,
            behavior,
            delay_ms,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn draft_outreach(&self, detail: &PlaceDetail) -> Result<OutreachDraft, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!(business = %detail.name, provider = self.provider, "[MOCK] Simulating outreach generation");

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.behavior {
            Behavior::Canned => Ok(OutreachDraft {
                email: format!(
                    "Subject: [MOCK] Hello {}\n\nThis is simulated outreach copy.",
                    detail.name
                ),
                antigravity_prompt: format!(
                    "[MOCK] Build a site for {} ({}).",
                    detail.name,
                    detail.category_label()
                ),
                description: format!("[MOCK] {} is a simulated business description.", detail.name),
            }),
            Behavior::Reply(raw) => parse_outreach(raw),
            Behavior::Fail => Err(DomainError::Ai(format!(
                "{} unavailable (mock)",
                self.provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter() {
        let adapter = MockAiAdapter::new().with_delay(10);
        let detail = PlaceDetail {
            name: "Ace".to_string(),
            ..PlaceDetail::default()
        };

        let draft = adapter.draft_outreach(&detail).await.unwrap();

        assert!(draft.email.contains("Ace"));
        assert!(!draft.antigravity_prompt.is_empty());
        assert_eq!(adapter.calls(), 1);
        assert_eq!(adapter.provider(), "mock");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let adapter = MockAiAdapter::failing("gemini");
        assert!(adapter.draft_outreach(&PlaceDetail::default()).await.is_err());
    }
}
