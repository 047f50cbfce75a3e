//! AI adapter module. Implements AiPort for LLM integration.
//!
//! Provides Gemini and OpenAI-compatible adapters, plus a mock adapter for testing.

pub mod gemini_adapter;
pub mod mock_adapter;
pub mod openai_adapter;
pub mod outreach_json;

pub use gemini_adapter::GeminiAdapter;
pub use mock_adapter::MockAiAdapter;
pub use openai_adapter::OpenAiAdapter;
pub use outreach_json::{outreach_prompt, parse_outreach, sanitize_json};
